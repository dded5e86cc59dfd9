// Client-side error taxonomy
use serde_json::{json, Value};
use thiserror::Error;

/// Outcome of a failed request against the club API.
///
/// Every variant ends at a view boundary: the view-state controller or the
/// mutation flow turns it into the string shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    // No response at all (DNS, refused connection, reset)
    #[error("Network error: {0}")]
    Network(String),

    // Server answered with a non-success status
    #[error("Request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    // 404 on a single-item read
    #[error("{message}")]
    NotFound { message: String },

    // Body was expected to be JSON and was not
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn network(message: impl Into<String>) -> Self {
        ClientError::Network(message.into())
    }

    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        ClientError::RequestFailed {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ClientError::NotFound {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode(message.into())
    }

    /// HTTP status when the server produced one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::RequestFailed { status, .. } => Some(*status),
            ClientError::NotFound { .. } => Some(404),
            ClientError::Network(_) | ClientError::Decode(_) => None,
        }
    }

    /// Human-readable text rendered inline by views and forms
    pub fn display_message(&self) -> &str {
        match self {
            ClientError::Network(_) => "Network error. Please try again.",
            ClientError::RequestFailed { message, .. } => message,
            ClientError::NotFound { message } => message,
            ClientError::Decode(_) => "Unexpected response from server",
        }
    }

    /// Stable code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::RequestFailed { .. } => "REQUEST_FAILED",
            ClientError::NotFound { .. } => "NOT_FOUND",
            ClientError::Decode(_) => "DECODE_ERROR",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.display_message(),
            "error_code": self.error_code(),
        });
        if let Some(status) = self.status_code() {
            body["status"] = json!(status);
        }
        body
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
