//! Error types for the supply aggregation pipeline

use thiserror::Error;

/// Errors that can occur while fetching data from an upstream endpoint
///
/// These are the failures the retry policy sees; decode and validation
/// failures are wrapped in [`FetchError::Decode`] / [`FetchError::OutOfRange`]
/// and are never worth retrying.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network request failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Per-call timeout elapsed and the in-flight call was cancelled
    #[error("Request timeout")]
    Timeout,

    /// Non-success HTTP status from the endpoint
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// JSON-RPC level error returned by the endpoint
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response arrived but did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Chain-specific payload could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Value decoded fine but failed range validation
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

impl FetchError {
    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Creates an OutOfRange error
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }
}

/// Errors from decoding chain-specific binary or numeric encodings
///
/// Retrying cannot fix bad data, so these always degrade straight to the
/// zero sentinel for the affected token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Account blob is shorter than the fixed field layout requires
    #[error("account data too short: need {needed} bytes, got {got}")]
    ShortBuffer { needed: usize, got: usize },

    /// Account blob is not valid base64
    #[error("invalid base64 account data: {0}")]
    Base64(String),

    /// Hex quantity could not be parsed as an unsigned integer
    #[error("invalid hex quantity: {0}")]
    Hex(String),

    /// Decimal-places count wider than the uint8 a token can report
    #[error("decimals value out of range: {0}")]
    DecimalsOutOfRange(String),

    /// The batched read returned no account at this position
    #[error("account not found")]
    MissingAccount,

    /// Response entry did not have the expected account structure
    #[error("malformed account structure: {0}")]
    Structure(String),
}
