//! Auth route handlers: verification codes, registration, login, profile.

use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use trikart_core::Email;

use crate::error::{AppError, Json, Result, clear_sentry_user};
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

use super::MessageResponse;

/// Request to issue a verification code.
#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
}

/// Response for a send-code request. `code` is only present when
/// `TRIKART_EXPOSE_VERIFICATION_CODES` is enabled; there is no real
/// email delivery behind this endpoint.
#[derive(Debug, Serialize)]
pub struct SendCodeResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub city: String,
    #[serde(default, alias = "code")]
    pub verification_code: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update request body; omitted fields keep their value.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// Response carrying a user and a fresh bearer token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Response carrying just a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Issue a verification code for an email address.
///
/// # Errors
///
/// Returns a validation error for a malformed email.
pub async fn send_code(
    State(state): State<AppState>,
    Json(body): Json<SendCodeRequest>,
) -> Result<Json<SendCodeResponse>> {
    let email = Email::parse(&body.email)
        .map_err(|e| AppError::Validation(format!("Invalid email: {e}")))?;

    let code = state.codes().issue(&email);
    tracing::debug!(email = %email, code, "Verification code issued");

    if state.config().expose_verification_codes {
        return Ok(Json(SendCodeResponse {
            message: "Verification code generated (dev mode)".to_owned(),
            code: Some(code),
        }));
    }

    Ok(Json(SendCodeResponse {
        message: "Verification code sent to your email".to_owned(),
        code: None,
    }))
}

/// Register a new account.
///
/// # Errors
///
/// Propagates [`crate::services::auth::AuthError`] for validation,
/// verification code, and duplicate email failures.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = AuthService::new(state.pool(), state.codes());
    let user = auth
        .register(&Registration {
            name: &body.name,
            phone: &body.phone,
            email: &body.email,
            password: &body.password,
            city: &body.city,
            verification_code: &body.verification_code,
        })
        .await?;
    let token = issue_token(&state, &user)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Login with email and password.
///
/// # Errors
///
/// Returns 401 for bad credentials and 403 for blocked accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool(), state.codes());
    let user = auth.login(&body.email, &body.password).await?;
    let token = issue_token(&state, &user)?;

    Ok(Json(AuthResponse { user, token }))
}

/// Current user's profile.
///
/// # Errors
///
/// Returns 404 if the account behind the token no longer exists.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<UserResponse>> {
    let auth = AuthService::new(state.pool(), state.codes());
    let user = auth.get_user(claims.user_id()).await?;

    Ok(Json(UserResponse { user }))
}

/// Update the current user's name, phone, or city.
///
/// # Errors
///
/// Returns a validation error for blank fields or an unserviceable city.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    let auth = AuthService::new(state.pool(), state.codes());
    let user = auth
        .update_profile(
            claims.user_id(),
            body.name.as_deref(),
            body.phone.as_deref(),
            body.city.as_deref(),
        )
        .await?;

    Ok(Json(UserResponse { user }))
}

/// Logout confirmation. Tokens are stateless; the client discards its
/// copy and this endpoint only clears the Sentry user scope.
pub async fn logout(RequireAuth(_claims): RequireAuth) -> Json<MessageResponse> {
    clear_sentry_user();
    Json(MessageResponse::new("Logout success (client deletes token)"))
}

fn issue_token(state: &AppState, user: &User) -> Result<String> {
    state
        .tokens()
        .issue(user.id, user.role)
        .map_err(|e| AppError::Internal(format!("failed to issue session token: {e}")))
}
