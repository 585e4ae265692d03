//! Handlers for `/api/auth` (register, login, logout).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stockroom_core::validation::{validate_email, validate_password, validate_username};
use stockroom_core::{NewUser, UserProfile, ValidationError};
use stockroom_db::UserStore;

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthUser;
use crate::handlers::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: UserProfile,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let username = req.username.trim();
    let email = req.email.trim();
    validate_username(username)?;
    validate_email(email)?;
    validate_password(&req.password)?;

    let duplicate = |field: &str| {
        let value = if field == "email" { email } else { username };
        ValidationError::Duplicate {
            field: field.to_string(),
            value: value.to_string(),
        }
    };

    if state.db.find_user_by_username(username).await?.is_some() {
        return Err(duplicate("username").into());
    }
    if state.db.find_user_by_email(email).await?.is_some() {
        return Err(duplicate("email").into());
    }

    let password_hash = state.auth.hash_password(&req.password)?;
    let user = state
        .db
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await
        .map_err(|e| match e.violated_column() {
            // Lost a race with another registration.
            Some(field @ ("username" | "email")) => ApiError::from(duplicate(field)),
            _ => e.into(),
        })?;

    info!(user_id = user.id, username = %user.username, "User registered");
    Ok(Json(RegisterResponse {
        message: "Registration successful",
        user: UserProfile::from(&user),
    }))
}

/// `POST /api/auth/login`
///
/// Unknown usernames and wrong passwords get the same answer, and both pay
/// for one Argon2 verification.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let Some(user) = state.db.find_user_by_username(req.username.trim()).await? else {
        warn!(username = %req.username.trim(), "Login for unknown user");
        state.auth.verify_decoy(&req.password);
        return Err(ApiError::InvalidCredentials);
    };

    if !state.auth.verify_password(&user.password_hash, &req.password) {
        warn!(user_id = user.id, "Login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    state.db.touch_last_login(user.id).await?;
    let user = state.db.find_user(user.id).await?.unwrap_or(user);
    let token = state.auth.issue_token(&user)?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        message: "Login successful",
        user: UserProfile::from(&user),
        token,
    }))
}

/// `POST /api/auth/logout`
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(user: AuthUser) -> Json<MessageResponse> {
    info!(user_id = user.user_id, "User logged out");
    Json(MessageResponse::new("Logout successful"))
}
