use axum::{
    extract::{Query, State},
    Extension,
};
use serde::Deserialize;

use crate::auth::SessionUser;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{DbInfo, UsersInfo};
use crate::AppState;

use super::params;

#[derive(Debug, Deserialize)]
pub struct SeedQuery {
    pub count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveSeedQuery {
    pub seeded: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedUsersQuery {
    pub count_usr: Option<String>,
    pub count_sup_usr: Option<String>,
}

/// GET /admin/seed?count=
pub async fn seed(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Query(q): Query<SeedQuery>,
) -> ApiResult<DbInfo> {
    let count = q
        .count
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("count is required"))
        .and_then(|raw| params::parse_usize("count", Some(raw), 0))?;

    let info = state
        .friends
        .seed(&usr, count)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    tracing::info!("seeded {} friends", count);
    Ok(ApiResponse::success(info))
}

/// GET /admin/removeseed?seeded=
pub async fn remove_seed(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Query(q): Query<RemoveSeedQuery>,
) -> ApiResult<DbInfo> {
    let seeded = params::parse_bool("seeded", q.seeded.as_deref(), true)?;

    let info = state
        .friends
        .remove_seed(&usr, seeded)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    tracing::info!("removed {} data", if seeded { "seeded" } else { "unseeded" });
    Ok(ApiResponse::success(info))
}

/// GET /admin/seedusers?countUsr=&countSupUsr=
pub async fn seed_users(
    State(state): State<AppState>,
    Extension(_usr): Extension<SessionUser>,
    Query(q): Query<SeedUsersQuery>,
) -> ApiResult<UsersInfo> {
    let count_usr = params::parse_usize("countUsr", q.count_usr.as_deref(), 32)?;
    let count_sup_usr = params::parse_usize("countSupUsr", q.count_sup_usr.as_deref(), 2)?;

    let info = state
        .logins
        .seed_users(count_usr, count_sup_usr)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    tracing::info!("seeded {} users, {} superusers", count_usr, count_sup_usr);
    Ok(ApiResponse::success(info))
}
