//! Immutable configuration for the aggregation pipeline
//!
//! The aggregator takes one [`AggregatorConfig`] value at construction.
//! `Default` wires the compile-time constants; tests inject alternate token
//! sets and mock endpoints without touching process-wide state.

use std::time::Duration;

use crate::constants::{
    BTC_STATS_URL, ETHEREUM_FALLBACK_RPC_URL, ETHEREUM_RPC_URL, FALLBACK_PRICE_USD,
    INITIAL_BACKOFF_MS, MAX_RETRY_ATTEMPTS, PRICE_API_URL, REQUEST_TIMEOUT_MS, SOLANA_RPC_URL,
};
use crate::types::TokenDescriptor;

/// Retry policy shared by every network-issuing component
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts per endpoint, including the first
    pub max_attempts: u32,

    /// Backoff before the first retry, doubled per subsequent attempt
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRY_ATTEMPTS,
            base_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
        }
    }
}

/// Ethereum-side endpoints and token list
#[derive(Debug, Clone)]
pub struct EthereumConfig {
    /// Primary JSON-RPC endpoint
    pub rpc_url: String,

    /// Tried after the primary's retry budget is exhausted
    pub fallback_rpc_url: String,

    /// Tokens to read, in output order
    pub tokens: Vec<TokenDescriptor>,
}

impl Default for EthereumConfig {
    fn default() -> Self {
        Self {
            rpc_url: ETHEREUM_RPC_URL.to_string(),
            fallback_rpc_url: ETHEREUM_FALLBACK_RPC_URL.to_string(),
            tokens: default_ethereum_tokens(),
        }
    }
}

/// Solana-side endpoint and token list
#[derive(Debug, Clone)]
pub struct SolanaConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,

    /// Mints to read, in output order
    pub tokens: Vec<TokenDescriptor>,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: SOLANA_RPC_URL.to_string(),
            tokens: default_solana_tokens(),
        }
    }
}

/// Complete configuration for one aggregator instance
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Ethereum-side reader configuration
    pub ethereum: EthereumConfig,

    /// Solana-side reader configuration
    pub solana: SolanaConfig,

    /// Bitcoin circulating-supply stats endpoint
    pub bitcoin_stats_url: String,

    /// Spot price endpoint
    pub price_url: String,

    /// Price reported when the price endpoint fails
    pub fallback_price: f64,

    /// Retry policy for every network call
    pub retry: RetryConfig,

    /// Hard timeout per network call; each retry attempt gets its own window
    pub request_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            ethereum: EthereumConfig::default(),
            solana: SolanaConfig::default(),
            bitcoin_stats_url: BTC_STATS_URL.to_string(),
            price_url: PRICE_API_URL.to_string(),
            fallback_price: FALLBACK_PRICE_USD,
            retry: RetryConfig::default(),
            request_timeout: Duration::from_millis(REQUEST_TIMEOUT_MS),
        }
    }
}

/// Wrapped-Bitcoin tokens tracked on Ethereum
pub fn default_ethereum_tokens() -> Vec<TokenDescriptor> {
    vec![
        TokenDescriptor::new("WBTC", "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599"),
        TokenDescriptor::new("renBTC", "0xeb4c2781e4eba804ce9a9803c67d0893436bb27d"),
        TokenDescriptor::new("HBTC", "0x0316eb71485b0ab14103307bf65a021042c6d380"),
        TokenDescriptor::new("sBTC", "0xfe18be6b3bd88a2d2a7f928d00292e7a9963cfc6"),
        TokenDescriptor::new("tBTC", "0x18084fba666a33d37592fa2633fd49a74dd93a88"),
    ]
}

/// Wrapped-Bitcoin mints tracked on Solana
pub fn default_solana_tokens() -> Vec<TokenDescriptor> {
    vec![
        TokenDescriptor::new("renBTC", "CDJWUqTcYTVAKXAVXoQZFes5JUFc7owSeq7eMQcDSbo5"),
        TokenDescriptor::new("WBTC", "3NZ9JMVBmGAqocybic2c7LQCJScmgsAZ6vQqTDzcqmJh"),
        TokenDescriptor::new("BTC", "9n4nbM75f5Ui33ZbPYXn59EwSgE8CGsHtAeTH5YFeJ9E"),
        TokenDescriptor::new("tBTC", "6DNSN2BJsaPFdFFc1zP37kkeNe4Usc1Sqkzr9C9vPWcU"),
    ]
}
