//! Ethereum-style chain reader
//!
//! Reads each configured token's total supply through two read-only
//! contract calls (`totalSupply()` and `decimals()`), issued concurrently
//! per token. The primary endpoint gets the full retry budget before the
//! same two-call sequence runs against the fallback endpoint. A token that
//! ultimately fails is recorded as a failed reading; the rest of the chain
//! is unaffected.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use num_bigint::BigUint;
use serde_json::json;

use crate::config::{EthereumConfig, RetryConfig};
use crate::constants::{DECIMALS_SELECTOR, DEFAULT_TOKEN_DECIMALS, TOTAL_SUPPLY_SELECTOR};
use crate::error::{DecodeError, FetchError};
use crate::retry::{with_retry, with_timeout};
use crate::rpc::{HttpTransport, RpcTransport};
use crate::source::ChainSupplySource;
use crate::types::{SupplyReading, TokenDescriptor};
use crate::units;

/// Reader for ERC-20 style wrapped tokens
pub struct EthereumReader {
    transport: Arc<dyn RpcTransport>,
    config: EthereumConfig,
    retry: RetryConfig,
    timeout: Duration,
}

impl EthereumReader {
    /// Creates a reader backed by an HTTP transport
    pub fn new(
        config: EthereumConfig,
        retry: RetryConfig,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let transport = Arc::new(HttpTransport::new(timeout)?);
        Ok(Self::with_transport(transport, config, retry, timeout))
    }

    /// Creates a reader with a custom transport, primarily for testing
    pub fn with_transport(
        transport: Arc<dyn RpcTransport>,
        config: EthereumConfig,
        retry: RetryConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            config,
            retry,
            timeout,
        }
    }

    /// Issues one `eth_call` and returns the hex-encoded result
    async fn call_contract(
        &self,
        endpoint: &str,
        contract: &str,
        selector: &str,
    ) -> Result<String, FetchError> {
        let params = json!([{ "to": contract, "data": selector }, "latest"]);

        let result = with_timeout(
            self.timeout,
            self.transport.call(endpoint, "eth_call", params),
        )
        .await?;

        result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| FetchError::invalid_response("eth_call result is not a string"))
    }

    /// Fetches the raw supply and decimals hex pair for one token from one
    /// endpoint
    ///
    /// The two calls run concurrently; both must succeed. A timed-out call
    /// is cancelled individually and does not cancel its sibling.
    async fn fetch_calls_from(
        &self,
        endpoint: &str,
        token: &TokenDescriptor,
    ) -> Result<(String, String), FetchError> {
        let (supply_result, decimals_result) = tokio::join!(
            self.call_contract(endpoint, &token.address, TOTAL_SUPPLY_SELECTOR),
            self.call_contract(endpoint, &token.address, DECIMALS_SELECTOR),
        );

        Ok((supply_result?, decimals_result?))
    }

    /// Fetches one token, exhausting the primary endpoint's retry budget
    /// before moving to the fallback
    ///
    /// Only transport-level failures drive retry and failover; a response
    /// that arrives but does not decode is terminal for this token, since
    /// retrying cannot fix bad data.
    async fn fetch_token(&self, token: &TokenDescriptor) -> Result<String, FetchError> {
        let mut last_error = None;

        for endpoint in [&self.config.rpc_url, &self.config.fallback_rpc_url] {
            let attempt = with_retry(
                || self.fetch_calls_from(endpoint, token),
                self.retry.max_attempts,
                self.retry.base_delay,
            )
            .await;

            match attempt {
                Ok((supply_hex, decimals_hex)) => {
                    let raw = decode_hex_uint(&supply_hex)?;
                    let decimals = decode_hex_decimals(&decimals_hex)?;
                    return Ok(units::to_decimal_string(&raw, decimals));
                }
                Err(error) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        symbol = %token.symbol,
                        error = %error,
                        "Endpoint exhausted for token"
                    );
                    last_error = Some(error);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FetchError::invalid_response("no endpoints configured")))
    }
}

#[async_trait]
impl ChainSupplySource for EthereumReader {
    async fn read_supplies(&self) -> Vec<SupplyReading> {
        let fetches = self.config.tokens.iter().map(|token| async move {
            match self.fetch_token(token).await {
                Ok(supply) => SupplyReading::ok(token.clone(), supply),
                Err(error) => SupplyReading::failed(token.clone(), error),
            }
        });

        join_all(fetches).await
    }

    fn chain_name(&self) -> &'static str {
        "ethereum"
    }
}

/// Decodes a big-endian hex quantity into an unsigned integer
fn decode_hex_uint(hex_str: &str) -> Result<BigUint, DecodeError> {
    let digits = hex_str.trim_start_matches("0x");
    if digits.is_empty() {
        return Err(DecodeError::Hex(hex_str.to_string()));
    }

    BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| DecodeError::Hex(hex_str.to_string()))
}

/// Decodes a hex-encoded decimal-places count, defaulting to 8 when the
/// contract returned an empty result
///
/// `decimals()` is a uint8 on chain; a wider value is a broken response
/// and must not drive a `10^decimals` computation.
fn decode_hex_decimals(hex_str: &str) -> Result<u32, DecodeError> {
    let digits = hex_str.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(DEFAULT_TOKEN_DECIMALS);
    }

    let value =
        BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| DecodeError::Hex(hex_str.to_string()))?;

    let decimals =
        u8::try_from(value).map_err(|_| DecodeError::DecimalsOutOfRange(hex_str.to_string()))?;

    Ok(u32::from(decimals))
}
