use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::AuthUser;
use crate::api::AppState;
use crate::domain::user::{Role, User, UserDraft};

/// Public view of an account; never includes the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub phone: String,
    pub age: i32,
    pub address: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            cpf: user.cpf.formatted(),
            email: user.email.into(),
            phone: user.phone.as_str().to_string(),
            name: user.name,
            age: user.age,
            address: user.address,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Current account
///
/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.find(auth.id).await?;
    Ok(Json(user.into()))
}

/// Replace the current account's profile
///
/// PUT /api/users/me
///
/// `password` may be omitted to keep the current one.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<UserDraft>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(draft) = payload?;
    let user = state.users.update_profile(auth.id, draft).await?;
    Ok(Json(user.into()))
}
