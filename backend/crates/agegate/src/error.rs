//! Age Gate Error Types
//!
//! This module provides gate-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! None of these ever reach the verification endpoint's client: the
//! endpoint folds them into its generic failure result.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::cookie::CookieError;
use thiserror::Error;

/// Gate-specific result type alias
pub type GateResult<T> = Result<T, GateError>;

/// Gate-specific error variants
#[derive(Debug, Error)]
pub enum GateError {
    /// A configuration value could not be parsed or is out of range
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    /// Form body could not be read within the buffering limit
    #[error("Failed to read form body: {0}")]
    FormBody(String),

    /// Rendered page body could not be read back
    #[error("Failed to read page body: {0}")]
    PageBody(String),

    /// Verification cookie could not be issued
    #[error("Cookie error: {0}")]
    Cookie(#[from] CookieError),
}

impl GateError {
    pub fn invalid_config(key: &'static str, reason: impl Into<String>) -> Self {
        GateError::InvalidConfig {
            key,
            reason: reason.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::FormBody(_) => StatusCode::BAD_REQUEST,
            GateError::InvalidConfig { .. }
            | GateError::PageBody(_)
            | GateError::Cookie(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::FormBody(_) => ErrorKind::BadRequest,
            GateError::InvalidConfig { .. }
            | GateError::PageBody(_)
            | GateError::Cookie(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            GateError::FormBody(reason) => {
                tracing::warn!(reason = %reason, "Age gate could not read form body");
            }
            GateError::InvalidConfig { key, reason } => {
                tracing::error!(key = %key, reason = %reason, "Age gate misconfigured");
            }
            _ => {
                tracing::error!(error = %self, "Age gate internal error");
            }
        }
    }
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        let kind = err.kind();
        if kind.is_server_error() {
            // don't leak details
            AppError::new(kind, "Internal error").with_source(err)
        } else {
            let message = err.to_string();
            AppError::new(kind, message)
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_body_is_client_error() {
        let err = GateError::FormBody("length limit exceeded".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let app = AppError::from(err);
        assert_eq!(app.message(), "Failed to read form body: length limit exceeded");
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = GateError::PageBody("stream reset".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let app = AppError::from(err);
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.message(), "Internal error");
    }
}
