use axum::extract::rejection::JsonRejection;

use super::jwt::TokenError;
use super::password::PasswordError;
use super::repo::StoreError;
use super::validation::{FieldError, ValidationError};

/// Why a request could not be tied to a user. Logged, never returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnauthenticatedReason {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("invalid auth scheme")]
    InvalidScheme,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("token subject no longer exists")]
    UnknownSubject,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthenticated: {0}")]
    Unauthenticated(UnauthenticatedReason),

    #[error("user store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => AuthError::DuplicateEmail,
            StoreError::Unavailable(msg) => AuthError::StoreUnavailable(msg),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        AuthError::Internal(e.to_string())
    }
}

impl From<UnauthenticatedReason> for AuthError {
    fn from(reason: UnauthenticatedReason) -> Self {
        AuthError::Unauthenticated(reason)
    }
}

/// Unreadable bodies (bad JSON, missing fields, wrong content type) are
/// reported like any other validation failure.
impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(ValidationError {
            errors: vec![FieldError {
                field: "body".into(),
                message: rejection.body_text(),
            }],
        })
    }
}
