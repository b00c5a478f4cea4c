//! Bearer token extractors.
//!
//! Handlers opt into authentication by taking [`RequireAuth`] (any
//! valid token) or [`RequireAdmin`] (valid token with the admin role)
//! as an argument. Rejections flow through [`AppError`] so they render
//! in the standard error shape.
//!
//! ```rust,ignore
//! async fn me(RequireAuth(claims): RequireAuth) -> impl IntoResponse {
//!     format!("user {}", claims.sub)
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use trikart_core::Role;

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::AuthError;
use crate::services::token::Claims;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
pub struct RequireAuth(pub Claims);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        claims_from_parts(parts, state).map(Self)
    }
}

/// Extractor that requires a valid bearer token carrying the admin role.
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state)?;

        if claims.role != Role::Admin {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }

        Ok(Self(claims))
    }
}

/// Pull and verify the bearer token, then tag the Sentry scope with the
/// authenticated user.
fn claims_from_parts(parts: &Parts, state: &AppState) -> Result<Claims, AppError> {
    let token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_owned()))?;

    let claims = state
        .tokens()
        .verify(token)
        .map_err(|_| AppError::Auth(AuthError::InvalidToken))?;

    set_sentry_user(claims.sub);
    Ok(claims)
}
