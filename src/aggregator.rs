//! Snapshot assembly: concurrent fan-out over all sources and
//! decimal-safe totals
//!
//! The aggregator is the only component that knows about cross-source
//! combination. It has no failure path of its own: every failure has
//! already been absorbed into a sentinel by the readers, so it only
//! composes already-safe values.

use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::Utc;

use crate::config::AggregatorConfig;
use crate::constants::TOTAL_FRACTION_DIGITS;
use crate::error::FetchError;
use crate::readers::{BitcoinReader, EthereumReader, PriceReader, SolanaReader};
use crate::source::{ChainSupplySource, ReferenceSupplySource, SpotPriceSource};
use crate::types::{Snapshot, SupplyReading, TokenSupply};

/// Produces one immutable [`Snapshot`] per invocation
pub struct Aggregator {
    ethereum: Arc<dyn ChainSupplySource>,
    solana: Arc<dyn ChainSupplySource>,
    reference: Arc<dyn ReferenceSupplySource>,
    price: Arc<dyn SpotPriceSource>,
}

impl Aggregator {
    /// Creates an aggregator wired to the real network readers
    pub fn new(config: AggregatorConfig) -> Result<Self, FetchError> {
        let ethereum = Arc::new(EthereumReader::new(
            config.ethereum.clone(),
            config.retry.clone(),
            config.request_timeout,
        )?);
        let solana = Arc::new(SolanaReader::new(
            config.solana.clone(),
            config.retry.clone(),
            config.request_timeout,
        )?);
        let reference = Arc::new(BitcoinReader::new(
            config.bitcoin_stats_url.clone(),
            config.retry.clone(),
            config.request_timeout,
        )?);
        let price = Arc::new(PriceReader::new(
            config.price_url.clone(),
            config.fallback_price,
            config.retry.clone(),
            config.request_timeout,
        )?);

        Ok(Self::with_sources(ethereum, solana, reference, price))
    }

    /// Creates an aggregator with custom sources, primarily for testing
    pub fn with_sources(
        ethereum: Arc<dyn ChainSupplySource>,
        solana: Arc<dyn ChainSupplySource>,
        reference: Arc<dyn ReferenceSupplySource>,
        price: Arc<dyn SpotPriceSource>,
    ) -> Self {
        Self {
            ethereum,
            solana,
            reference,
            price,
        }
    }

    /// Runs every source concurrently and assembles the snapshot
    ///
    /// The four reads are independent failure domains; this is a join
    /// barrier, not a pipeline. Idempotent and side-effect-free beyond
    /// the network reads the sources perform.
    pub async fn produce_snapshot(&self) -> Snapshot {
        let (ethereum_readings, solana_readings, reference_btc_supply, price_quote) = tokio::join!(
            self.ethereum.read_supplies(),
            self.solana.read_supplies(),
            self.reference.read_reference_supply(),
            self.price.read_price(),
        );

        let ethereum_tokens: Vec<TokenSupply> = ethereum_readings
            .into_iter()
            .map(SupplyReading::into_supply)
            .collect();
        let solana_tokens: Vec<TokenSupply> = solana_readings
            .into_iter()
            .map(SupplyReading::into_supply)
            .collect();

        let ethereum_sum = sum_supplies(&ethereum_tokens);
        let solana_sum = sum_supplies(&solana_tokens);
        let grand_sum = &ethereum_sum + &solana_sum;

        tracing::debug!(
            ethereum_tokens = ethereum_tokens.len(),
            solana_tokens = solana_tokens.len(),
            grand_total = %grand_sum,
            "Assembled supply snapshot"
        );

        Snapshot {
            ethereum_tokens,
            solana_tokens,
            ethereum_total: format_total(&ethereum_sum),
            solana_total: format_total(&solana_sum),
            grand_total: format_total(&grand_sum),
            reference_btc_supply,
            price_quote,
            generated_at: Utc::now(),
        }
    }
}

/// Sums supply strings exactly; the sentinel "0" contributes nothing
fn sum_supplies(tokens: &[TokenSupply]) -> BigDecimal {
    tokens.iter().fold(BigDecimal::from(0), |acc, token| {
        acc + BigDecimal::from_str(&token.supply).unwrap_or_else(|_| BigDecimal::from(0))
    })
}

/// Renders a total at exactly 8 fractional digits
///
/// Pads the fraction explicitly: `BigDecimal` drops the scale when
/// rendering zero, and a degraded chain sums to exactly zero.
fn format_total(total: &BigDecimal) -> String {
    let mut rendered = total
        .with_scale_round(TOTAL_FRACTION_DIGITS, RoundingMode::HalfUp)
        .to_string();

    let fraction_digits = match rendered.find('.') {
        Some(dot) => rendered.len() - dot - 1,
        None => {
            rendered.push('.');
            0
        }
    };
    for _ in fraction_digits..TOTAL_FRACTION_DIGITS as usize {
        rendered.push('0');
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::{MockChainSource, MockPriceSource, MockReferenceSource};
    use crate::types::TokenDescriptor;

    fn aggregator(ethereum: MockChainSource, solana: MockChainSource) -> Aggregator {
        Aggregator::with_sources(
            Arc::new(ethereum),
            Arc::new(solana),
            Arc::new(MockReferenceSource("19,731,245".to_string())),
            Arc::new(MockPriceSource(64_000.0)),
        )
    }

    #[tokio::test]
    async fn sums_chains_at_eight_fraction_digits() {
        let snapshot = aggregator(
            MockChainSource::uniform("ethereum", 5, "100"),
            MockChainSource::uniform("solana", 6, "50.00000000"),
        )
        .produce_snapshot()
        .await;

        assert_eq!(snapshot.ethereum_total, "500.00000000");
        assert_eq!(snapshot.solana_total, "300.00000000");
        assert_eq!(snapshot.grand_total, "800.00000000");
        assert_eq!(snapshot.reference_btc_supply, "19,731,245");
        assert_eq!(snapshot.price_quote, 64_000.0);
    }

    #[tokio::test]
    async fn failed_tokens_are_zeroed_in_place() {
        let ethereum = MockChainSource::new(
            "ethereum",
            vec![
                (TokenDescriptor::new("WBTC", "0xa"), Ok("1.5".to_string())),
                (TokenDescriptor::new("BAD", "0xb"), Err("rpc down".to_string())),
                (TokenDescriptor::new("tBTC", "0xc"), Ok("2.5".to_string())),
            ],
        );
        let snapshot = aggregator(ethereum, MockChainSource::uniform("solana", 0, "0"))
            .produce_snapshot()
            .await;

        let symbols: Vec<&str> = snapshot
            .ethereum_tokens
            .iter()
            .map(|t| t.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["WBTC", "BAD", "tBTC"]);
        assert_eq!(snapshot.ethereum_tokens[1].supply, "0");
        assert_eq!(snapshot.ethereum_total, "4.00000000");
        assert_eq!(snapshot.solana_total, "0.00000000");
        assert_eq!(snapshot.grand_total, "4.00000000");
    }

    #[test]
    fn zero_totals_keep_eight_fraction_digits() {
        assert_eq!(format_total(&BigDecimal::from(0)), "0.00000000");
        assert_eq!(format_total(&BigDecimal::from(500)), "500.00000000");
        assert_eq!(
            format_total(&BigDecimal::from_str("1.5").unwrap()),
            "1.50000000"
        );
    }

    #[tokio::test]
    async fn fully_degraded_chains_total_to_fixed_digit_zero() {
        let ethereum = MockChainSource::new(
            "ethereum",
            vec![
                (TokenDescriptor::new("WBTC", "0xa"), Err("down".to_string())),
                (TokenDescriptor::new("tBTC", "0xb"), Err("down".to_string())),
            ],
        );
        let snapshot = aggregator(ethereum, MockChainSource::uniform("solana", 0, "0"))
            .produce_snapshot()
            .await;

        assert_eq!(snapshot.ethereum_total, "0.00000000");
        assert_eq!(snapshot.solana_total, "0.00000000");
        assert_eq!(snapshot.grand_total, "0.00000000");
    }

    #[tokio::test]
    async fn high_precision_supplies_sum_exactly() {
        // An 18-decimal token keeps its native precision until the total
        let ethereum = MockChainSource::new(
            "ethereum",
            vec![
                (
                    TokenDescriptor::new("tBTC", "0xa"),
                    Ok("1.000000000000000001".to_string()),
                ),
                (TokenDescriptor::new("WBTC", "0xb"), Ok("0.5".to_string())),
            ],
        );
        let snapshot = aggregator(ethereum, MockChainSource::uniform("solana", 0, "0"))
            .produce_snapshot()
            .await;

        assert_eq!(snapshot.ethereum_total, "1.50000000");
    }

    #[tokio::test]
    async fn snapshot_serializes_camel_case() {
        let snapshot = aggregator(
            MockChainSource::uniform("ethereum", 1, "1"),
            MockChainSource::uniform("solana", 1, "2"),
        )
        .produce_snapshot()
        .await;

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("ethereumTokens").is_some());
        assert!(json.get("solanaTotal").is_some());
        assert!(json.get("grandTotal").is_some());
        assert!(json.get("referenceBtcSupply").is_some());
        assert!(json.get("priceQuote").is_some());
        assert!(json.get("generatedAt").is_some());
    }
}
