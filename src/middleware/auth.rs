use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth;
use crate::error::ApiError;
use crate::AppState;

/// Gate for operations open to ordinary users and superusers.
pub async fn require_user(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    role_gate(&state, &["usr", "supusr"], request, next).await
}

/// Gate for superuser-only operations.
pub async fn require_super_user(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    role_gate(&state, &["supusr"], request, next).await
}

/// Runs before the operation body: extract the bearer token, decode it, and
/// reject unless the identity holds at least one of the required roles. On
/// success the [`auth::SessionUser`] is stored as a request extension for the
/// rest of the request.
async fn role_gate(
    state: &AppState,
    required: &[&str],
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(msg) => return ApiError::unauthorized(msg).into_response(),
    };

    let user = match auth::decode_token(state.config.jwt(), &token) {
        Ok(user) => user,
        Err(e) => return ApiError::unauthorized(e.to_string()).into_response(),
    };

    if !user.has_any_role(required) {
        return ApiError::forbidden(format!(
            "user {} lacks a required role ({})",
            user.user_name,
            required.join(", ")
        ))
        .into_response();
    }

    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Scheme-level normalization happens here and nowhere else: the `Bearer`
/// prefix is matched case-insensitively and the token is trimmed.
fn bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let value = header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| "Authorization header must use Bearer token format".to_string())?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err("Authorization header must use Bearer token format".to_string());
    }

    let token = token.trim();
    if token.is_empty() {
        return Err("Empty bearer token".to_string());
    }
    Ok(token.to_string())
}
