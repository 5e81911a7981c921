use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use super::users::UserResponse;
use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::auth::jwt::create_token;
use crate::domain::user::{User, UserDraft};

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus the account it was issued for
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

fn issue(state: &AppState, user: User) -> Result<AuthResponse, ApiError> {
    let token = create_token(user.id, user.role, &state.jwt_secret, state.token_ttl_hours)?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Register a new customer
///
/// POST /api/auth/register
///
/// Every invalid field is reported at once (422); an email or CPF that is
/// already registered yields 409.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<UserDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(draft) = payload?;
    let user = state.users.register(draft).await?;

    Ok((StatusCode::CREATED, Json(issue(&state, user)?)))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = payload?;
    let user = state.users.authenticate(&req.email, &req.password).await?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(issue(&state, user)?))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
