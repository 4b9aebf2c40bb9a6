//! Bitcoin circulating-supply reference reader
//!
//! One GET to a stats endpoint returning the circulating supply in
//! satoshis, validated against the 21,000,000 BTC hard cap. The figure is
//! advisory context for the snapshot, so any failure reports "0" instead
//! of surfacing an error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::RetryConfig;
use crate::constants::{MAX_BTC_SUPPLY_SATS, SATOSHIS_PER_BTC};
use crate::error::FetchError;
use crate::retry::{with_retry, with_timeout};
use crate::rpc::{HttpTransport, RestTransport};
use crate::source::ReferenceSupplySource;
use crate::units;

/// Reader for the reference Bitcoin supply figure
pub struct BitcoinReader {
    transport: Arc<dyn RestTransport>,
    url: String,
    retry: RetryConfig,
    timeout: Duration,
}

impl BitcoinReader {
    /// Creates a reader backed by an HTTP transport
    pub fn new(url: String, retry: RetryConfig, timeout: Duration) -> Result<Self, FetchError> {
        let transport = Arc::new(HttpTransport::new(timeout)?);
        Ok(Self::with_transport(transport, url, retry, timeout))
    }

    /// Creates a reader with a custom transport, primarily for testing
    pub fn with_transport(
        transport: Arc<dyn RestTransport>,
        url: String,
        retry: RetryConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            url,
            retry,
            timeout,
        }
    }

    /// Fetches the raw satoshi figure, retrying transient failures
    async fn fetch_total_satoshis(&self) -> Result<u64, FetchError> {
        let figure = with_retry(
            || {
                with_timeout(self.timeout, async {
                    let text = self.transport.get_text(&self.url).await?;
                    text.trim().parse::<f64>().map_err(|_| {
                        FetchError::invalid_response(format!("non-numeric supply figure: {}", text))
                    })
                })
            },
            self.retry.max_attempts,
            self.retry.base_delay,
        )
        .await?;

        // Validation failures are terminal, never retried
        validate_satoshi_figure(figure)
    }
}

#[async_trait]
impl ReferenceSupplySource for BitcoinReader {
    async fn read_reference_supply(&self) -> String {
        match self.fetch_total_satoshis().await {
            Ok(satoshis) => units::to_display_integer((satoshis / SATOSHIS_PER_BTC) as f64),
            Err(error) => {
                tracing::warn!(error = %error, "Reference supply read failed, reporting zero");
                "0".to_string()
            }
        }
    }
}

/// Validates a satoshi figure against the possible supply range
pub(crate) fn validate_satoshi_figure(figure: f64) -> Result<u64, FetchError> {
    if !figure.is_finite() || figure < 0.0 || figure > MAX_BTC_SUPPLY_SATS as f64 {
        return Err(FetchError::out_of_range(format!(
            "satoshi figure {}",
            figure
        )));
    }

    Ok(figure as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockRestTransport;

    fn reader(transport: Arc<MockRestTransport>) -> BitcoinReader {
        BitcoinReader::with_transport(
            transport,
            "http://stats".to_string(),
            RetryConfig {
                max_attempts: 2,
                base_delay: Duration::from_millis(10),
            },
            Duration::from_secs(5),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn formats_whole_coins_for_display() {
        let transport = Arc::new(MockRestTransport::new(|_| {
            Ok("1973124500000000".to_string())
        }));

        let supply = reader(transport).read_reference_supply().await;
        assert_eq!(supply, "19,731,245");
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_figure_reports_zero_without_retry() {
        let transport = Arc::new(MockRestTransport::new(|_| Ok("-5".to_string())));
        let reader = reader(transport.clone());

        assert_eq!(reader.read_reference_supply().await, "0");
        // Range validation is terminal: one call, no backoff
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn figure_above_hard_cap_reports_zero() {
        // 22,000,000 BTC in satoshis
        let transport = Arc::new(MockRestTransport::new(|_| {
            Ok("2200000000000000".to_string())
        }));

        assert_eq!(reader(transport).read_reference_supply().await, "0");
    }

    #[tokio::test(start_paused = true)]
    async fn endpoint_failure_reports_zero_after_retries() {
        let transport = Arc::new(MockRestTransport::new(|_| Err("stats down".to_string())));
        let reader = reader(transport.clone());

        assert_eq!(reader.read_reference_supply().await, "0");
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn accepts_plausible_figures() {
        assert_eq!(validate_satoshi_figure(0.0).unwrap(), 0);
        assert_eq!(
            validate_satoshi_figure(1_973_124_500_000_000.0).unwrap(),
            1_973_124_500_000_000
        );
        assert_eq!(
            validate_satoshi_figure(MAX_BTC_SUPPLY_SATS as f64).unwrap(),
            MAX_BTC_SUPPLY_SATS
        );
    }

    #[test]
    fn rejects_out_of_range_figures() {
        assert!(validate_satoshi_figure(-1.0).is_err());
        assert!(validate_satoshi_figure(MAX_BTC_SUPPLY_SATS as f64 + 1e8).is_err());
        assert!(validate_satoshi_figure(f64::NAN).is_err());
        assert!(validate_satoshi_figure(f64::INFINITY).is_err());
    }
}
