//! Base-unit to decimal-string conversion and display formatting
//!
//! Supplies arrive as arbitrary-precision base-unit integers (an 18-decimal
//! token easily exceeds u64). All conversion here is integer arithmetic;
//! floats never touch a supply figure.

use num_bigint::BigUint;

/// Renders `raw / 10^decimal_places` as a minimal decimal string
///
/// No trailing fractional zeros, no scientific notation, "0" for zero.
///
/// # Arguments
/// * `raw` - Supply in base units
/// * `decimal_places` - How many base-unit digits are fractional
pub fn to_decimal_string(raw: &BigUint, decimal_places: u32) -> String {
    let zero = BigUint::from(0u32);
    if *raw == zero {
        return "0".to_string();
    }

    if decimal_places == 0 {
        return raw.to_string();
    }

    let divisor = BigUint::from(10u32).pow(decimal_places);
    let whole = raw / &divisor;
    let fraction = raw % &divisor;

    if fraction == zero {
        return whole.to_string();
    }

    let mut fraction_digits = fraction.to_string();
    while fraction_digits.len() < decimal_places as usize {
        fraction_digits.insert(0, '0');
    }
    let trimmed = fraction_digits.trim_end_matches('0');

    format!("{}.{}", whole, trimmed)
}

/// Locale-free thousands-grouped integer string, for display only
///
/// The fractional part is dropped; this value never feeds back into any
/// numeric computation.
pub fn to_display_integer(value: f64) -> String {
    let negative = value < 0.0;
    let mut remaining = value.abs().trunc() as u128;

    let mut groups = Vec::new();
    loop {
        let group = remaining % 1_000;
        remaining /= 1_000;
        if remaining == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{:03}", group));
    }
    groups.reverse();

    let digits = groups.join(",");
    if negative {
        format!("-{}", digits)
    } else {
        digits
    }
}
