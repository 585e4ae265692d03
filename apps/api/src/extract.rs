//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use stockroom_core::DbId;
use stockroom_db::UserStore;

use crate::auth::extract_bearer_token;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer token in the `Authorization` header.
///
/// The token must verify and its user must still exist. Every failure is the
/// same 401.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> ApiResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".into()))?;

        let user_id = state.auth.authenticate(token).map_err(|e| {
            debug!(error = %e, "Token rejected");
            ApiError::Unauthorized("Invalid or expired token".into())
        })?;

        let user = state
            .db
            .find_user(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Unknown user".into()))?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
        })
    }
}
