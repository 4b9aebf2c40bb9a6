//! # Wrapped-Bitcoin Supply Aggregation SDK
//!
//! Aggregates wrapped-Bitcoin supply figures from two chains (Ethereum
//! contract calls, Solana batched account reads), a reference Bitcoin
//! circulating-supply figure, and a spot price, into one immutable
//! [`Snapshot`] per request.
//!
//! Every network read goes through a shared retry-with-backoff wrapper and
//! a per-call timeout. Failures degrade to a "0" sentinel at the smallest
//! applicable granularity (per token where possible, per batch otherwise);
//! a degraded snapshot is always preferred over a failed request.
//!
//! ## Usage
//!
//! ```no_run
//! use wrapped_supply_sdk::{Aggregator, AggregatorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let aggregator = Aggregator::new(AggregatorConfig::default())?;
//! let snapshot = aggregator.produce_snapshot().await;
//!
//! println!(
//!     "{} wrapped BTC across chains (of {} BTC mined)",
//!     snapshot.grand_total, snapshot.reference_btc_supply
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Callers decide how to serialize or render the snapshot; it serializes
//! to camelCase JSON out of the box.

pub mod aggregator;
pub mod config;
pub mod constants;
pub mod error;
pub mod readers;
pub mod retry;
pub mod rpc;
pub mod source;
pub mod types;
pub mod units;

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use config::{AggregatorConfig, EthereumConfig, RetryConfig, SolanaConfig};
pub use error::{DecodeError, FetchError};
pub use source::{ChainSupplySource, ReferenceSupplySource, SpotPriceSource};
pub use types::{Snapshot, SupplyReading, TokenDescriptor, TokenSupply};
