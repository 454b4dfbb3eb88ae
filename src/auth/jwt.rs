use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::OffsetDateTime;
use tracing::debug;

use super::claims::Claims;
use crate::config::JwtConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a presented token was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("bad token signature")]
    BadSignature,

    #[error("token expired")]
    Expired,

    /// Issuer or audience do not match this service.
    #[error("token claims rejected")]
    InvalidClaims,

    #[error("failed to sign token: {0}")]
    Sign(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::InvalidSubject => {
                TokenError::InvalidClaims
            }
            _ => TokenError::Malformed,
        }
    }
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs(
                u64::try_from(cfg.ttl_minutes)
                    .unwrap_or(0)
                    .saturating_mul(60),
            ),
        }
    }
}

impl JwtKeys {
    /// Claims for `subject` issued now and expiring after the configured ttl.
    pub fn claims_for(&self, subject: &str) -> Claims {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Claims {
            sub: subject.to_owned(),
            iat: now,
            exp: now.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        }
    }

    pub fn sign(&self, subject: &str) -> Result<String, TokenError> {
        self.sign_claims(&self.claims_for(subject))
    }

    pub fn sign_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        let token = encode(&Header::new(ALGORITHM), claims, &self.encoding)
            .map_err(|e| TokenError::Sign(e.to_string()))?;
        debug!(exp = claims.exp, "jwt signed");
        Ok(token)
    }

    /// Decodes and validates `token`.
    ///
    /// The signature is checked before any claim is looked at, so a forged
    /// token is always `BadSignature` whatever its `exp` says.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)?.claims;

        // jsonwebtoken accepts exp == now; a token is dead from exp onwards.
        if OffsetDateTime::now_utc().unix_timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        debug!(exp = claims.exp, "jwt verified");
        Ok(claims)
    }
}
