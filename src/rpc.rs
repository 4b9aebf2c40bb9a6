//! JSON-RPC transport shared by the chain readers

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::constants::USER_AGENT;
use crate::error::FetchError;

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Transport for JSON-RPC POST calls
///
/// The chain readers depend on this seam instead of a concrete HTTP client
/// so tests can script endpoint behavior per call.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Issues a single JSON-RPC call and returns the raw `result` value
    async fn call(&self, url: &str, method: &str, params: Value) -> Result<Value, FetchError>;
}

/// Transport for plain HTTP GET endpoints
///
/// The stats and price readers depend on this seam for the same reason the
/// chain readers depend on [`RpcTransport`].
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// Fetches a URL and returns the response body
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// reqwest-backed transport used in production
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given client-level timeout
    pub fn new(request_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, url: &str, method: &str, params: Value) -> Result<Value, FetchError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            return Err(FetchError::Http {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let text = response.text().await.map_err(FetchError::Network)?;

        let parsed: JsonRpcResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::invalid_response(format!("malformed JSON-RPC response: {}", e))
        })?;

        if let Some(error) = parsed.error {
            return Err(FetchError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        parsed
            .result
            .ok_or_else(|| FetchError::invalid_response("JSON-RPC response missing result"))
    }
}

#[async_trait]
impl RestTransport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            return Err(FetchError::Http {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response.text().await.map_err(FetchError::Network)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    type Handler = Box<dyn Fn(&str, &str, &Value) -> Result<Value, String> + Send + Sync>;

    /// Scripted transport for tests
    ///
    /// The handler sees (url, method, params) for every call; string errors
    /// come back as [`FetchError::InvalidResponse`].
    pub struct MockTransport {
        handler: Handler,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockTransport {
        pub fn new(
            handler: impl Fn(&str, &str, &Value) -> Result<Value, String> + Send + Sync + 'static,
        ) -> Self {
            Self {
                handler: Box::new(handler),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Number of calls issued so far
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// (url, method) pairs in call order
        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RpcTransport for MockTransport {
        async fn call(&self, url: &str, method: &str, params: Value) -> Result<Value, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), method.to_string()));

            (self.handler)(url, method, &params).map_err(FetchError::InvalidResponse)
        }
    }

    type RestHandler = Box<dyn Fn(&str) -> Result<String, String> + Send + Sync>;

    /// Scripted GET transport for tests
    pub struct MockRestTransport {
        handler: RestHandler,
        calls: Mutex<usize>,
    }

    impl MockRestTransport {
        pub fn new(handler: impl Fn(&str) -> Result<String, String> + Send + Sync + 'static) -> Self {
            Self {
                handler: Box::new(handler),
                calls: Mutex::new(0),
            }
        }

        /// Number of calls issued so far
        pub fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl RestTransport for MockRestTransport {
        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            *self.calls.lock().unwrap() += 1;
            (self.handler)(url).map_err(FetchError::InvalidResponse)
        }
    }
}
