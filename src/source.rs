//! Aggregation-facing source abstractions
//!
//! The aggregator only knows these three traits; the concrete readers in
//! [`crate::readers`] implement them, and tests swap in mocks.

use async_trait::async_trait;

use crate::types::SupplyReading;

/// A chain reader producing one reading per configured token
///
/// Implementations must return exactly one reading per configured token,
/// in configuration order — failures are recorded in place, never dropped
/// or reordered.
#[async_trait]
pub trait ChainSupplySource: Send + Sync {
    /// Reads every configured token's supply
    async fn read_supplies(&self) -> Vec<SupplyReading>;

    /// Short chain label for logging
    fn chain_name(&self) -> &'static str;
}

/// Advisory reference supply figure
///
/// Returns a display string of whole coins, or "0" when the read failed.
/// Never raises: the figure is contextual, not load-bearing.
#[async_trait]
pub trait ReferenceSupplySource: Send + Sync {
    async fn read_reference_supply(&self) -> String;
}

/// Spot price with a hardcoded fallback
///
/// Never raises: any failure collapses to the fallback constant.
#[async_trait]
pub trait SpotPriceSource: Send + Sync {
    async fn read_price(&self) -> f64;
}
