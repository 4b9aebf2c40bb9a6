//! Types for the supply aggregation pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Static configuration entry for one wrapped token on one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    /// Display symbol, e.g. "WBTC"
    pub symbol: String,

    /// Contract address (Ethereum) or mint address (Solana)
    pub address: String,
}

impl TokenDescriptor {
    /// Creates a new token descriptor
    pub fn new(symbol: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            address: address.into(),
        }
    }
}

/// Per-token supply figure as served to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSupply {
    /// Display symbol
    pub symbol: String,

    /// Human decimal string; "0" when the read for this token failed
    pub supply: String,

    /// Chain-specific identifier the figure was read from
    pub source_address: String,
}

/// Per-token read outcome, before failures collapse to the "0" sentinel
///
/// Carries the failure reason so it can be logged at aggregation time
/// instead of being thrown away where the read happened.
#[derive(Debug)]
pub struct SupplyReading {
    /// The token this reading is for
    pub descriptor: TokenDescriptor,

    /// Decoded supply string, or why the read failed
    pub outcome: Result<String, FetchError>,
}

impl SupplyReading {
    /// Creates a successful reading
    pub fn ok(descriptor: TokenDescriptor, supply: String) -> Self {
        Self {
            descriptor,
            outcome: Ok(supply),
        }
    }

    /// Creates a failed reading
    pub fn failed(descriptor: TokenDescriptor, error: FetchError) -> Self {
        Self {
            descriptor,
            outcome: Err(error),
        }
    }

    /// Collapses to the caller-facing shape, logging the failure reason
    ///
    /// Failed reads become supply "0" so aggregation stays total-defined.
    pub fn into_supply(self) -> TokenSupply {
        let supply = match self.outcome {
            Ok(supply) => supply,
            Err(error) => {
                tracing::warn!(
                    symbol = %self.descriptor.symbol,
                    address = %self.descriptor.address,
                    error = %error,
                    "Supply read failed, reporting zero"
                );
                "0".to_string()
            }
        };

        TokenSupply {
            symbol: self.descriptor.symbol,
            supply,
            source_address: self.descriptor.address,
        }
    }
}

/// One complete aggregation result for a single request
///
/// Immutable once constructed; serializes with the camelCase field names
/// the JSON entry point expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Per-token supplies on the Ethereum side, in configuration order
    pub ethereum_tokens: Vec<TokenSupply>,

    /// Per-token supplies on the Solana side, in configuration order
    pub solana_tokens: Vec<TokenSupply>,

    /// Sum of Ethereum supplies, fixed at 8 fractional digits
    pub ethereum_total: String,

    /// Sum of Solana supplies, fixed at 8 fractional digits
    pub solana_total: String,

    /// Sum of both chain totals, fixed at 8 fractional digits
    pub grand_total: String,

    /// Thousands-grouped whole-coin Bitcoin supply, "0" when unavailable
    pub reference_btc_supply: String,

    /// Spot price quote (falls back to a constant, never absent)
    pub price_quote: f64,

    /// When this snapshot was assembled
    pub generated_at: DateTime<Utc>,
}
