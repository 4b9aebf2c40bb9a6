//! Solana-style chain reader
//!
//! Reads every configured mint in a single batched `getMultipleAccounts`
//! call. The response is a parallel list of base64 account blobs,
//! positionally aligned with the request; that alignment is preserved when
//! zipping results back to symbols. Each blob decodes independently: one
//! missing or malformed account zeroes that token only. If the batched
//! call itself fails after retries, every token in the chain is zeroed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use num_bigint::BigUint;
use serde::Deserialize;
use serde_json::json;

use crate::config::{RetryConfig, SolanaConfig};
use crate::constants::{DEFAULT_TOKEN_DECIMALS, MINT_DECIMALS_OFFSET, MINT_SUPPLY_OFFSET};
use crate::error::{DecodeError, FetchError};
use crate::retry::{with_retry, with_timeout};
use crate::rpc::{HttpTransport, RpcTransport};
use crate::source::ChainSupplySource;
use crate::types::{SupplyReading, TokenDescriptor};
use crate::units;

#[derive(Debug, Deserialize)]
struct MultipleAccountsResult {
    value: Vec<Option<AccountEntry>>,
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    /// `[payload, encoding]` pair; payload is base64
    data: (String, String),
}

/// Fixed-offset fields read out of an SPL mint account
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct MintFields {
    pub supply: u64,
    pub decimals: u32,
}

/// Reader for SPL-mint style wrapped tokens
pub struct SolanaReader {
    transport: Arc<dyn RpcTransport>,
    config: SolanaConfig,
    retry: RetryConfig,
    timeout: Duration,
}

impl SolanaReader {
    /// Creates a reader backed by an HTTP transport
    pub fn new(
        config: SolanaConfig,
        retry: RetryConfig,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let transport = Arc::new(HttpTransport::new(timeout)?);
        Ok(Self::with_transport(transport, config, retry, timeout))
    }

    /// Creates a reader with a custom transport, primarily for testing
    pub fn with_transport(
        transport: Arc<dyn RpcTransport>,
        config: SolanaConfig,
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

    /// Issues the batched account read, one round trip for all mints
    async fn fetch_accounts(&self) -> Result<Vec<Option<AccountEntry>>, FetchError> {
        let mints: Vec<&str> = self
            .config
            .tokens
            .iter()
            .map(|t| t.address.as_str())
            .collect();
        let params = json!([mints, { "encoding": "base64" }]);

        let result = with_retry(
            || {
                with_timeout(
                    self.timeout,
                    self.transport
                        .call(&self.config.rpc_url, "getMultipleAccounts", params.clone()),
                )
            },
            self.retry.max_attempts,
            self.retry.base_delay,
        )
        .await?;

        let parsed: MultipleAccountsResult = serde_json::from_value(result).map_err(|e| {
            FetchError::invalid_response(format!("malformed getMultipleAccounts result: {}", e))
        })?;

        Ok(parsed.value)
    }
}

#[async_trait]
impl ChainSupplySource for SolanaReader {
    async fn read_supplies(&self) -> Vec<SupplyReading> {
        match self.fetch_accounts().await {
            Ok(accounts) => decode_account_list(&self.config.tokens, accounts),
            Err(error) => {
                tracing::warn!(error = %error, "Batched account read failed, zeroing chain");
                let reason = error.to_string();
                self.config
                    .tokens
                    .iter()
                    .map(|token| {
                        SupplyReading::failed(
                            token.clone(),
                            FetchError::invalid_response(format!(
                                "batched account read failed: {}",
                                reason
                            )),
                        )
                    })
                    .collect()
            }
        }
    }

    fn chain_name(&self) -> &'static str {
        "solana"
    }
}

/// Zips the positional account list back onto the token configuration
fn decode_account_list(
    tokens: &[TokenDescriptor],
    accounts: Vec<Option<AccountEntry>>,
) -> Vec<SupplyReading> {
    let mut slots = accounts;

    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let entry = slots.get_mut(index).and_then(Option::take);
            match entry {
                Some(account) => match decode_mint_payload(&account.data.0) {
                    Ok(supply) => SupplyReading::ok(token.clone(), supply),
                    Err(error) => SupplyReading::failed(token.clone(), error.into()),
                },
                None => SupplyReading::failed(token.clone(), DecodeError::MissingAccount.into()),
            }
        })
        .collect()
}

/// Decodes one base64 mint blob into a human decimal supply string
fn decode_mint_payload(payload: &str) -> Result<String, DecodeError> {
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    let mint = decode_mint_account(&bytes)?;
    Ok(units::to_decimal_string(
        &BigUint::from(mint.supply),
        mint.decimals,
    ))
}

/// Reads the supply and decimals fields out of a raw mint account
///
/// Bounds-checked: short input is a typed error, never a panic. The
/// decimals byte defaults to 8 when the blob stops right after the supply.
pub(crate) fn decode_mint_account(bytes: &[u8]) -> Result<MintFields, DecodeError> {
    let supply = read_u64_le(bytes, MINT_SUPPLY_OFFSET)?;
    let decimals = bytes
        .get(MINT_DECIMALS_OFFSET)
        .map(|b| u32::from(*b))
        .unwrap_or(DEFAULT_TOKEN_DECIMALS);

    Ok(MintFields { supply, decimals })
}

/// Bounds-checked little-endian u64 read
fn read_u64_le(bytes: &[u8], offset: usize) -> Result<u64, DecodeError> {
    let end = offset + 8;
    let slice = bytes.get(offset..end).ok_or(DecodeError::ShortBuffer {
        needed: end,
        got: bytes.len(),
    })?;

    let array: [u8; 8] = slice.try_into().map_err(|_| DecodeError::ShortBuffer {
        needed: end,
        got: bytes.len(),
    })?;

    Ok(u64::from_le_bytes(array))
}
