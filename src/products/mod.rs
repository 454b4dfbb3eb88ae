use crate::state::AppState;
use axum::Router;

pub mod catalog;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::product_routes())
}
