//! HTTP rendering of [`AuthError`].
//!
//! Every failure leaves as `{"error", "message", "details"?}`. The
//! unauthenticated sub-causes are logged here and collapsed into one body.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::auth::{validation::FieldError, AuthError};

pub const UNAUTHENTICATED_MESSAGE: &str = "Could not validate credentials";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect email or password";

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthError::Validation(v) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: "validation_error".into(),
                    message: "Request validation failed".into(),
                    details: Some(v.errors),
                },
            ),
            AuthError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("duplicate_email", "Email already registered"),
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("invalid_credentials", INVALID_CREDENTIALS_MESSAGE),
            ),
            AuthError::Unauthenticated(reason) => {
                warn!(%reason, "request unauthenticated");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("unauthenticated", UNAUTHENTICATED_MESSAGE),
                )
            }
            AuthError::StoreUnavailable(msg) => {
                error!(error = %msg, "user store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("service_unavailable", "Service temporarily unavailable"),
                )
            }
            AuthError::Internal(msg) => {
                error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error", "An internal error occurred"),
                )
            }
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
