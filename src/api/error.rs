//! Typed errors for policy manager API calls
//!
//! Every failure mode is normalised into a [`BackendError`] before it reaches
//! the error view, so callers never have to inspect transport details.

use thiserror::Error;

use super::types::BackendError;

/// Fallback summary when the backend did not send a structured error
pub const GENERIC_FETCH_SUMMARY: &str = "An error occurred while fetching the";
/// Fallback action when the backend did not send a structured error
pub const GENERIC_ACTION: &str = "Please try again later";

/// API operation errors
///
/// - `Transport` - connection refused, DNS, timeout; never reached the server
/// - `Status` - non-2xx response; the raw body is kept for parsing
/// - `Decode` - 2xx response whose body is not the expected JSON
/// - `InvalidUrl` - configured base URL cannot be joined with an endpoint path
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Build an error from a non-success status and its body text
    pub fn from_http_status(status: reqwest::StatusCode, body: String) -> Self {
        ApiError::Status { status, body }
    }

    /// Whether the server answered at all
    pub fn reached_server(&self) -> bool {
        matches!(self, ApiError::Status { .. } | ApiError::Decode(_))
    }

    /// Normalise into the structured shape shown by the error view.
    ///
    /// A status error whose body parses as a non-empty backend error object
    /// is passed through; anything else becomes a generic error carrying the
    /// raw text as its description.
    pub fn to_backend_error(&self, entity: &str) -> BackendError {
        if let ApiError::Status { body, .. } = self {
            if let Some(parsed) = parse_backend_error(body) {
                return parsed;
            }
            let description = if body.trim().is_empty() {
                self.to_string()
            } else {
                body.clone()
            };
            return generic_error(entity, description);
        }
        generic_error(entity, self.to_string())
    }
}

/// Parse a response body as a backend error object.
///
/// Returns `None` for non-JSON bodies, JSON that is not an object, or an
/// object carrying none of the known fields.
pub fn parse_backend_error(body: &str) -> Option<BackendError> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    if !value.is_object() {
        return None;
    }
    let parsed: BackendError = serde_json::from_value(value).ok()?;
    (!parsed.is_empty()).then_some(parsed)
}

/// Generic error for `entity` with the given description
pub fn generic_error(entity: &str, description: String) -> BackendError {
    BackendError {
        error: format!("{} {}", GENERIC_FETCH_SUMMARY, entity),
        description,
        action: GENERIC_ACTION.to_string(),
    }
}
