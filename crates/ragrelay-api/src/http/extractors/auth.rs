//! Bearer token authentication extractor.
//!
//! Extracts the token from the `Authorization: Bearer <token>` header
//! and resolves it to a full user record. Handlers receive the
//! resolved identity explicitly; nothing downstream reads ambient
//! security state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use ragrelay_types::error::AuthError;
use ragrelay_types::identity::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this verifies the bearer token
/// and loads the user it names.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;
        let user = state.auth_service.authenticate(&token).await?;
        Ok(CurrentUser(user))
    }
}

/// Extract the bearer token from the Authorization header.
fn extract_bearer_token(parts: &Parts) -> Result<String, AppError> {
    let Some(auth) = parts.headers.get("authorization") else {
        return Err(AppError::Auth(AuthError::InvalidToken));
    };

    let auth_str = auth
        .to_str()
        .map_err(|_| AppError::Auth(AuthError::InvalidToken))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .ok_or(AppError::Auth(AuthError::InvalidToken))
}
