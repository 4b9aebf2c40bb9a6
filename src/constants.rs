//! Constants for the supply aggregation pipeline
//!
//! Default endpoints and tuning parameters live here; tests and embedders
//! override them through [`crate::config::AggregatorConfig`] rather than
//! through process-wide state.

/// Hard per-call timeout for every network request (in milliseconds)
///
/// Each retry attempt gets its own timeout window of this length.
pub const REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Maximum number of attempts per endpoint when a call fails
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Initial backoff delay for retries (in milliseconds), doubled per attempt
pub const INITIAL_BACKOFF_MS: u64 = 500;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "wrapped-supply-sdk/0.1.0";

/// Primary Ethereum JSON-RPC endpoint
pub const ETHEREUM_RPC_URL: &str = "https://eth.llamarpc.com";

/// Fallback Ethereum JSON-RPC endpoint, tried after the primary's retry
/// budget is exhausted
pub const ETHEREUM_FALLBACK_RPC_URL: &str = "https://cloudflare-eth.com";

/// Solana JSON-RPC endpoint
pub const SOLANA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Bitcoin circulating-supply stats endpoint (returns satoshis as plain text)
pub const BTC_STATS_URL: &str = "https://blockchain.info/q/totalbc";

/// Spot price endpoint (CoinGecko simple-price shape)
pub const PRICE_API_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd";

/// Spot price used when the price endpoint fails or returns garbage
pub const FALLBACK_PRICE_USD: f64 = 60_000.0;

/// ERC-20 `totalSupply()` call selector
pub const TOTAL_SUPPLY_SELECTOR: &str = "0x18160ddd";

/// ERC-20 `decimals()` call selector
pub const DECIMALS_SELECTOR: &str = "0x313ce567";

/// Decimal places assumed when a token does not report its own
pub const DEFAULT_TOKEN_DECIMALS: u32 = 8;

/// Fractional digits for chain totals, matching Bitcoin's smallest unit
pub const TOTAL_FRACTION_DIGITS: i64 = 8;

/// Base units per whole Bitcoin
pub const SATOSHIS_PER_BTC: u64 = 100_000_000;

/// Largest possible Bitcoin supply, in satoshis
pub const MAX_BTC_SUPPLY_SATS: u64 = 21_000_000 * SATOSHIS_PER_BTC;

/// Byte offset of the supply field (little-endian u64) in an SPL mint account
pub const MINT_SUPPLY_OFFSET: usize = 36;

/// Byte offset of the decimals field (u8) in an SPL mint account
pub const MINT_DECIMALS_OFFSET: usize = 44;
