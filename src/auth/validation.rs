//! Turns raw request bodies into checked values before they reach the
//! service. Emails are trimmed and lower-cased here, so every layer below
//! sees one canonical spelling.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::dto::{LoginRequest, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_NAME_LEN: usize = 100;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {} errors", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    fn push(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// A registration that passed validation.
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Login credentials; lives for one call only.
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_registration(req: RegisterRequest) -> Result<Registration, ValidationError> {
    let mut err = ValidationError { errors: Vec::new() };

    let name = req.name.trim().to_owned();
    if name.is_empty() {
        err.push("name", "Name is required");
    } else if name.chars().count() > MAX_NAME_LEN {
        err.push("name", "Name must be at most 100 characters");
    }

    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        err.push("email", "Invalid email");
    }

    let password_len = req.password.chars().count();
    if password_len < MIN_PASSWORD_LEN {
        err.push("password", "Password must be at least 8 characters");
    } else if password_len > MAX_PASSWORD_LEN {
        err.push("password", "Password must be at most 128 characters");
    }

    let phone = req
        .phone
        .map(|p| p.trim().to_owned())
        .filter(|p| !p.is_empty());
    if let Some(p) = &phone {
        if !PHONE_RE.is_match(p) {
            err.push("phone", "Invalid phone number");
        }
    }

    err.into_result(Registration {
        name,
        email,
        password: req.password,
        phone,
    })
}

/// Only shape is checked here; whether the account exists is the service's call.
pub fn validate_login(req: LoginRequest) -> Result<Credentials, ValidationError> {
    let mut err = ValidationError { errors: Vec::new() };

    let email = normalize_email(&req.email);
    if email.is_empty() {
        err.push("email", "Email is required");
    }
    if req.password.is_empty() {
        err.push("password", "Password is required");
    }

    err.into_result(Credentials {
        email,
        password: req.password,
    })
}
