use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Upper bound for `JWT_TTL_MINUTES`: one week.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 7;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

impl JwtConfig {
    pub fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.secret.is_empty(), "JWT_SECRET must not be empty");
        anyhow::ensure!(
            (1..=MAX_TTL_MINUTES).contains(&self.ttl_minutes),
            "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// When unset the service keeps users in memory.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub store_timeout_secs: u64,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "shopfront".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "shopfront-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 30),
        };
        jwt.check()?;

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            store_timeout_secs: env_or("STORE_TIMEOUT_SECS", 5),
            jwt,
        })
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    /// Configuration used by tests: in-memory store, short-lived tokens.
    pub fn for_tests(secret: &str) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: None,
            db_max_connections: 1,
            store_timeout_secs: 5,
            jwt: JwtConfig {
                secret: secret.into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
