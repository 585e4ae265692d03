//! Shared helpers for the API integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use stockroom_api::{build_app_router, ApiConfig, AppState};
use stockroom_core::{CatalogPolicy, CategoryDeletePolicy, ProductDeletePolicy};
use stockroom_db::{Database, DbConfig};

pub const PASSWORD: &str = "correct-horse";

/// A test `ApiConfig` with the default policies.
pub fn test_config() -> ApiConfig {
    let policy = CatalogPolicy::default();
    ApiConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_path: ":memory:".into(),
        max_connections: 1,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_issuer: "stock".to_string(),
        jwt_expiry_hours: 1,
        cors_origins: vec!["http://localhost:4200".to_string()],
        category_delete_policy: policy.category_delete,
        product_delete_policy: policy.product_delete,
    }
}

/// The full router over a fresh in-memory database.
pub async fn build_test_app() -> (Router, Database) {
    build_test_app_with(test_config()).await
}

pub async fn build_test_app_with(config: ApiConfig) -> (Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let app = build_app_router(AppState::new(db.clone(), config));
    (app, db)
}

/// A config with non-default deletion policies.
pub fn strict_config() -> ApiConfig {
    ApiConfig {
        category_delete_policy: CategoryDeletePolicy::Reject,
        product_delete_policy: ProductDeletePolicy::RetainHistory,
        ..test_config()
    }
}

/// Sends one request and returns the status and the JSON body
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// Registers `username` and logs in, returning the bearer token.
pub async fn login_as(app: &Router, username: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// Creates a product and returns its id.
pub async fn create_product(app: &Router, token: &str, sku: &str, category_id: Option<i64>) -> i64 {
    let (status, body) = post(
        app,
        "/api/products",
        token,
        json!({ "name": format!("Product {sku}"), "sku": sku, "categoryId": category_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}
