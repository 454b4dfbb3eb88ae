//! End-to-end tests driving the router against the in-memory user store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shopfront::{app::build_app, state::AppState};
use time::OffsetDateTime;
use tower::ServiceExt;

struct TestApp {
    app: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::fake();
        Self {
            app: build_app(state.clone()),
            state,
        }
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    async fn get(&self, uri: &str, auth: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn register_rahul(&self) -> (StatusCode, Value) {
        self.post(
            "/register",
            json!({"name": "Rahul", "email": "rahul@example.com", "password": "rahul@2021"}),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post("/login", json!({"email": email, "password": password}))
            .await
    }
}

#[tokio::test]
async fn root_welcomes() {
    let t = TestApp::new();
    let (status, body) = t.get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("Welcome"));
}

#[tokio::test]
async fn register_login_and_list_products() {
    let t = TestApp::new();

    let (status, body) = t.register_rahul().await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "rahul@example.com");
    assert!(body["message"].is_string());

    let (status, body) = t.login("rahul@example.com", "rahul@2021").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap().to_owned();

    let (status, body) = t.get("/products", Some(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"productId": "P101", "name": "Laptop", "price": 55000, "inStock": true, "category": "Electronics"},
            {"productId": "P102", "name": "Headphones", "price": 2500, "inStock": false, "category": "Accessories"},
            {"productId": "P103", "name": "Smartwatch", "price": 9999, "inStock": true, "category": "Wearables"}
        ])
    );
}

#[tokio::test]
async fn products_require_a_valid_token() {
    let t = TestApp::new();

    for auth in [None, Some("Bearer garbled.token.value"), Some("Basic cmFodWw6eA=="), Some("Bearer ")] {
        let (status, body) = t.get("/products", auth).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "auth header {auth:?}");
        assert_eq!(body["error"], "unauthenticated");
    }
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let t = TestApp::new();
    t.register_rahul().await;

    let keys = t.state.auth.keys();
    let mut claims = keys.claims_for("rahul@example.com");
    claims.exp = OffsetDateTime::now_utc().unix_timestamp() - 1;
    let token = keys.sign_claims(&claims).unwrap();

    let (status, _) = t.get("/products", Some(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_is_bad_request() {
    let t = TestApp::new();
    assert_eq!(t.register_rahul().await.0, StatusCode::CREATED);

    let (status, body) = t
        .post(
            "/register",
            json!({"name": "Other", "email": "RAHUL@example.com", "password": "another-pass"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicate_email");
}

#[tokio::test]
async fn bad_logins_look_identical() {
    let t = TestApp::new();
    t.register_rahul().await;

    let wrong_password = t.login("rahul@example.com", "nope-nope").await;
    let unknown_email = t.login("ghost@example.com", "rahul@2021").await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn login_accepts_legacy_username_field() {
    let t = TestApp::new();
    t.register_rahul().await;

    let (status, body) = t
        .post(
            "/login",
            json!({"username": "rahul@example.com", "password": "rahul@2021"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
}

#[tokio::test]
async fn invalid_registration_lists_field_errors() {
    let t = TestApp::new();
    let (status, body) = t
        .post(
            "/register",
            json!({"name": "R", "email": "not-an-email", "password": "short"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn register_with_missing_field_returns_json_error() {
    let t = TestApp::new();
    let (status, body) = t.post("/register", json!({"email": "a@b.io"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "body");
    assert!(body["details"][0]["message"]
        .as_str()
        .unwrap()
        .contains("name"));
}

#[tokio::test]
async fn login_without_content_type_returns_json_error() {
    let t = TestApp::new();
    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .body(Body::from(
            json!({"email": "rahul@example.com", "password": "rahul@2021"}).to_string(),
        ))
        .unwrap();
    let (status, body) = t.send(req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert!(body["details"][0]["message"].is_string());
}

#[tokio::test]
async fn register_with_broken_json_returns_json_error() {
    let t = TestApp::new();
    let req = Request::builder()
        .method("POST")
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = t.send(req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}
