use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

/// GET / — service info.
pub async fn root() -> Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "GoodFriends API",
            "version": version,
            "description": "CRUD web API for friends, pets and quotes behind JWT role authorization",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/auth/login (public - token acquisition)",
                "admin": "/admin/seed, /admin/removeseed, /admin/seedusers (supusr)",
                "friends": "/friends/* (usr, supusr; delete supusr)",
                "pets": "/pets/* (usr, supusr; delete supusr)",
                "quotes": "/quotes/* (usr, supusr; delete supusr)",
            }
        }
    }))
}

/// GET /health — resolve every active-set login's connection reference and
/// report ok or degraded.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let set = state.config.active_db_set();

    let mut failures = Vec::new();
    for login in &set.db_logins {
        if let Err(e) = state.config.connection_string(login) {
            failures.push(format!("{}: {}", login.db_user_login, e));
        }
    }

    if failures.is_empty() {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "dbLocation": set.db_location,
                    "dbServer": set.db_server,
                    "logins": set.db_logins.len(),
                }
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "connection resolution failed",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "failures": failures,
                }
            })),
        )
    }
}
