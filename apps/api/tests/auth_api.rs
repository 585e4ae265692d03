//! Integration tests for authentication and the health endpoint.

mod common;

use axum::http::{Method, StatusCode};
use common::{build_test_app, get, login_as, send, PASSWORD};
use serde_json::json;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_reports_database() {
    let (app, _) = build_test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["dbHealthy"], true);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _) = build_test_app().await;
    let (status, _) = send(&app, Method::GET, "/api/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Register / login / logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_login_logout_flow() {
    let (app, _) = build_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "clerk", "email": "clerk@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "clerk");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "clerk", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"]["lastLoginAt"].is_string());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = get(&app, "/api/stock/summary", &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (app, _) = build_test_app().await;
    login_as(&app, "clerk").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "clerk", "email": "other@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (app, _) = build_test_app().await;
    login_as(&app, "clerk").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "cashier", "email": " clerk@example.com ", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE");
    assert!(body["error"].as_str().unwrap().contains("email"));

    // The rejected account was never created.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "cashier", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_registration_is_rejected() {
    let (app, _) = build_test_app().await;

    for body in [
        json!({ "username": "ab", "email": "ab@example.com", "password": PASSWORD }),
        json!({ "username": "clerk", "email": "not-an-email", "password": PASSWORD }),
        json!({ "username": "clerk", "email": "clerk@example.com", "password": "short" }),
    ] {
        let (status, reply) =
            send(&app, Method::POST, "/api/auth/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn bad_credentials_get_the_same_answer() {
    let (app, _) = build_test_app().await;
    login_as(&app, "clerk").await;

    for body in [
        json!({ "username": "clerk", "password": "wrong-password" }),
        json!({ "username": "nobody", "password": PASSWORD }),
    ] {
        let (status, reply) = send(&app, Method::POST, "/api/auth/login", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply["error"], "Invalid credentials");
    }
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let (app, _) = build_test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = get(&app, "/api/products", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Signed with another secret.
    let foreign = {
        let mut config = common::test_config();
        config.jwt_secret = "someone-else".to_string();
        let (other, _) = common::build_test_app_with(config).await;
        login_as(&other, "clerk").await
    };
    let (status, _) = get(&app, "/api/products", &foreign).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
