use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse},
        error::AuthError,
        validation::{validate_login, validate_registration},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    let Json(payload) = payload?;
    let registration = validate_registration(payload)?;
    let email = registration.email.clone();
    state.auth.register(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
            email,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AuthError> {
    let Json(payload) = payload?;
    let credentials = validate_login(payload)?;
    let token = state.auth.login(credentials).await?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_serialization() {
        let json = serde_json::to_value(TokenResponse::bearer("abc".into())).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "bearer");
    }

    #[test]
    fn login_request_accepts_username_alias() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"rahul@example.com","password":"x"}"#).unwrap();
        assert_eq!(req.email, "rahul@example.com");
    }
}
