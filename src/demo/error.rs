use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the demo backend, rendered as `{"detail": ...}` bodies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DemoError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Token error: {0}")]
    Token(String),
}

impl DemoError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        DemoError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        DemoError::Unauthorized(message.into())
    }

    pub fn not_found() -> Self {
        DemoError::NotFound("Not found.".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DemoError::BadRequest(_) => StatusCode::BAD_REQUEST,
            DemoError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DemoError::NotFound(_) => StatusCode::NOT_FOUND,
            DemoError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for DemoError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        DemoError::Token(err.to_string())
    }
}

impl IntoResponse for DemoError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "demo backend error");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
