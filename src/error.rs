//! Error taxonomy for the catalog client.

use thiserror::Error;

/// Failures surfaced by the API client and the controllers on top of it.
///
/// None of these are retried automatically; each one is shown to the user
/// once and the user decides whether to retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Non-2xx response. The message comes from the JSON `detail` field,
    /// else the raw body, else `HTTP <status>`.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// No response was received (DNS, connection reset, CORS, ...).
    #[error("network error: {0}")]
    Transport(String),

    /// 2xx response whose body does not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Caught client-side before any network call was issued.
    #[error("{0}")]
    Validation(String),

    /// The backend answered a category lookup with an empty body.
    #[error("{}", crate::constants::text::CATEGORY_NOT_FOUND)]
    NotFound,
}

impl ClientError {
    /// HTTP status for `Request` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Error body the backend sends on failures (`{"detail": "..."}`).
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Build the user-visible message for a failed response.
///
/// A JSON body with a string `detail` wins; a JSON body without one falls
/// back to `HTTP <status>`; a non-JSON body is used verbatim unless empty.
pub fn error_message(status: u16, body: &str) -> String {
    let fallback = format!("HTTP {status}");
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => match parsed.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s,
            Some(serde_json::Value::Null) | None => fallback,
            Some(other) => other.to_string(),
        },
        Err(_) if body.is_empty() => fallback,
        Err(_) => body.to_string(),
    }
}
