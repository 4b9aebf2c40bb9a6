//! Spot price reader
//!
//! One GET to a simple-price endpoint. The quote is cosmetic context for
//! the snapshot, so every failure mode (network, malformed body,
//! non-positive value) collapses to a hardcoded fallback constant.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::RetryConfig;
use crate::error::FetchError;
use crate::retry::{with_retry, with_timeout};
use crate::rpc::{HttpTransport, RestTransport};
use crate::source::SpotPriceSource;

/// Simple-price response: asset id -> currency -> quote
#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(flatten)]
    quotes: HashMap<String, CurrencyQuotes>,
}

#[derive(Debug, Deserialize)]
struct CurrencyQuotes {
    usd: f64,
}

/// Reader for the spot price quote
pub struct PriceReader {
    transport: Arc<dyn RestTransport>,
    url: String,
    fallback: f64,
    retry: RetryConfig,
    timeout: Duration,
}

impl PriceReader {
    /// Creates a reader backed by an HTTP transport
    pub fn new(
        url: String,
        fallback: f64,
        retry: RetryConfig,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let transport = Arc::new(HttpTransport::new(timeout)?);
        Ok(Self::with_transport(transport, url, fallback, retry, timeout))
    }

    /// Creates a reader with a custom transport, primarily for testing
    pub fn with_transport(
        transport: Arc<dyn RestTransport>,
        url: String,
        fallback: f64,
        retry: RetryConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            url,
            fallback,
            retry,
            timeout,
        }
    }

    /// Fetches and validates the quote, retrying transient failures
    async fn fetch_price(&self) -> Result<f64, FetchError> {
        let price = with_retry(
            || {
                with_timeout(self.timeout, async {
                    let text = self.transport.get_text(&self.url).await?;

                    let parsed: PriceResponse = serde_json::from_str(&text).map_err(|e| {
                        FetchError::invalid_response(format!(
                            "malformed price response: {}. Response: {}",
                            e, text
                        ))
                    })?;

                    parsed
                        .quotes
                        .values()
                        .next()
                        .map(|q| q.usd)
                        .ok_or_else(|| FetchError::invalid_response("no quotes in price response"))
                })
            },
            self.retry.max_attempts,
            self.retry.base_delay,
        )
        .await?;

        // Validation failures are terminal, never retried
        validate_price(price)
    }
}

#[async_trait]
impl SpotPriceSource for PriceReader {
    async fn read_price(&self) -> f64 {
        match self.fetch_price().await {
            Ok(price) => price,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    fallback = self.fallback,
                    "Price read failed, using fallback"
                );
                self.fallback
            }
        }
    }
}

/// Validates that a quote is positive and finite
pub(crate) fn validate_price(price: f64) -> Result<f64, FetchError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(FetchError::out_of_range(format!("spot price {}", price)))
    }
}
