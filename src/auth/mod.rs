use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod validation;

pub use error::{AuthError, UnauthenticatedReason};
pub use extractors::AuthUser;
pub use services::AuthService;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
