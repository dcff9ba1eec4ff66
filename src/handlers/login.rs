use axum::{extract::State, Json};

use crate::auth;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{LoginCredentials, LoginSessionDto};
use crate::AppState;

/// POST /auth/login — verify credentials and issue a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> ApiResult<LoginSessionDto> {
    let user = state
        .logins
        .login_user(&credentials.user_name, &credentials.password)
        .await
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let token = auth::encode_token(
        state.config.jwt(),
        user.user_id,
        &user.user_name,
        vec![user.role.clone()],
    )
    .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    tracing::info!("user {} logged in", user.user_name);
    Ok(ApiResponse::success(LoginSessionDto {
        token,
        user_id: user.user_id,
        user_name: user.user_name,
        role: user.role,
    }))
}
