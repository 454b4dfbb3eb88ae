use std::{future::Future, sync::Arc, time::Duration};

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::error::{AuthError, UnauthenticatedReason};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password, PasswordError};
use super::repo::{StoreError, UserStore};
use super::repo_types::NewUser;
use super::validation::{Credentials, Registration};

/// Registration, login and per-request authentication over a [`UserStore`].
pub struct AuthService {
    store: Arc<dyn UserStore>,
    keys: JwtKeys,
    store_timeout: Duration,
    // Verified against when the email is unknown so both login failures cost one Argon2 run.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        keys: JwtKeys,
        store_timeout: Duration,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = hash_password(&Uuid::new_v4().to_string())?;
        Ok(Self {
            store,
            keys,
            store_timeout,
            dummy_hash,
        })
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    async fn store_call<T, F>(&self, op: &'static str, fut: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(StoreError::Unavailable(msg))) => {
                warn!(op, error = %msg, "user store error");
                Err(AuthError::StoreUnavailable(msg))
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                warn!(op, timeout = ?self.store_timeout, "user store timed out");
                Err(AuthError::StoreUnavailable(format!("{op} timed out")))
            }
        }
    }

    #[instrument(skip(self, reg), fields(email = %reg.email))]
    pub async fn register(&self, reg: Registration) -> Result<Uuid, AuthError> {
        let existing = self
            .store_call("find_by_email", self.store.find_by_email(&reg.email))
            .await?;
        if existing.is_some() {
            warn!("email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_off_runtime(reg.password).await?;
        let new_user = NewUser {
            id: Uuid::new_v4(),
            name: reg.name,
            email: reg.email,
            phone: reg.phone,
            password_hash,
        };

        // The insert is the real uniqueness check; the lookup above only fails fast.
        let user = self
            .store_call("insert", self.store.insert(new_user))
            .await
            .inspect_err(|e| {
                if matches!(e, AuthError::DuplicateEmail) {
                    warn!("lost registration race for email");
                }
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user.id)
    }

    #[instrument(skip(self, creds), fields(email = %creds.email))]
    pub async fn login(&self, creds: Credentials) -> Result<String, AuthError> {
        let user = self
            .store_call("find_by_email", self.store.find_by_email(&creds.email))
            .await?;

        let Some(user) = user else {
            // Same Argon2 cost as a real check, so unknown emails are not faster.
            let _equalize = verify_off_runtime(creds.password, self.dummy_hash.clone()).await;
            warn!("login unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_off_runtime(creds.password, user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .keys
            .sign(&user.email)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Resolves a bearer token to the email of a user that still exists.
    pub async fn authenticate(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.keys.verify(token).map_err(|e| {
            warn!(reason = %e, "token rejected");
            AuthError::Unauthenticated(UnauthenticatedReason::Token(e))
        })?;

        match self
            .store_call("find_by_email", self.store.find_by_email(&claims.sub))
            .await?
        {
            Some(user) => Ok(user.email),
            None => {
                warn!("token subject not found");
                Err(UnauthenticatedReason::UnknownSubject.into())
            }
        }
    }
}

async fn hash_off_runtime(plain: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| AuthError::Internal(format!("hash task failed: {e}")))?
        .map_err(AuthError::from)
}

async fn verify_off_runtime(plain: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| AuthError::Internal(format!("verify task failed: {e}")))?
        .map_err(AuthError::from)
}
