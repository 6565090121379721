//! Error types for the lab server
//!
//! Every per-request failure renders as a plain-text body with a fixed
//! template, so clients see the same shape for the same outcome.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::debug;

/// Content type used for every body the server writes
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Main error type for the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("route not found")]
    RouteNotFound,

    #[error("missing ip parameter")]
    InputMissing,

    #[error("input blocked by blacklist: suspicious token detected")]
    InputBlocked,

    #[error("command error: {error}, output: {output}")]
    ExecutionFailure { error: String, output: String },

    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("server error: {0}")]
    Serve(String),
}

impl ServerError {
    /// Stable identifier for logs
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::RouteNotFound => "route_not_found",
            Self::InputMissing => "input_missing",
            Self::InputBlocked => "input_blocked",
            Self::ExecutionFailure { .. } => "execution_failure",
            Self::Bind { .. } => "bind_failure",
            Self::Serve(_) => "serve_failure",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::InputMissing => StatusCode::BAD_REQUEST,
            Self::InputBlocked => StatusCode::BAD_REQUEST,
            Self::ExecutionFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Bind { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Serve(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        debug!("Responding with {}: {}", self.error_type(), self);
        (
            self.status_code(),
            [(header::CONTENT_TYPE, TEXT_PLAIN)],
            self.to_string(),
        )
            .into_response()
    }
}

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;
