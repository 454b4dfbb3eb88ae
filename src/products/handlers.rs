use axum::{routing::get, Json, Router};
use tracing::{debug, instrument};

use super::catalog::{all_products, Product};
use crate::{auth::AuthUser, state::AppState};

pub fn product_routes() -> Router<AppState> {
    Router::new().route("/products", get(list_products))
}

#[instrument(skip_all)]
pub async fn list_products(AuthUser(email): AuthUser) -> Json<Vec<Product>> {
    debug!(%email, "listing products");
    Json(all_products())
}
