//! Authentication endpoints: login and registration.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use ragrelay_types::identity::{User, UserRole};

use crate::http::error::AppError;
use crate::http::extractors::json::Json;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/auth/login - Verify credentials and issue a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<axum::Json<LoginResponse>, AppError> {
    let token = state
        .auth_service
        .login(&request.username, &request.password)
        .await?;
    Ok(axum::Json(LoginResponse { token }))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<UserRole>,
}

/// POST /api/auth/register - Create a new user account.
///
/// The `User` serialization never includes the password hash.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<axum::Json<User>, AppError> {
    let user = state
        .auth_service
        .register(&request.username, &request.password, request.roles)
        .await?;
    Ok(axum::Json(user))
}
