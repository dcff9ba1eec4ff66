use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use crate::auth::SessionUser;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{Friend, FriendCuDto, RespPageDto};
use crate::AppState;

use super::params::{self, ItemQuery, ReadQuery};

/// GET /friends/read
pub async fn read(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Query(q): Query<ReadQuery>,
) -> ApiResult<RespPageDto<Friend>> {
    let seeded = params::parse_bool("seeded", q.seeded.as_deref(), true)?;
    let flat = params::parse_bool("flat", q.flat.as_deref(), true)?;
    let page_nr = params::parse_usize("pageNr", q.page_nr.as_deref(), 0)?;
    let page_size = params::parse_usize("pageSize", q.page_size.as_deref(), 10)?;
    let filter = params::normalize_filter(q.filter);

    let page = state
        .friends
        .read_friends(&usr, seeded, flat, filter.as_deref(), page_nr, page_size)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(ApiResponse::success(page))
}

/// GET /friends/readitem
pub async fn read_item(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Query(q): Query<ItemQuery>,
) -> ApiResult<Friend> {
    let id = params::parse_uuid("id", q.id.as_deref())?;
    let flat = params::parse_bool("flat", q.flat.as_deref(), false)?;

    let item = state
        .friends
        .read_friend(&usr, id, flat)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Item with id {} does not exist", id)))?;
    Ok(ApiResponse::success(item))
}

/// GET /friends/readitemdto
pub async fn read_item_dto(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Query(q): Query<ItemQuery>,
) -> ApiResult<FriendCuDto> {
    let id = params::parse_uuid("id", q.id.as_deref())?;

    let item = state
        .friends
        .read_friend(&usr, id, false)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Item with id {} does not exist", id)))?;
    Ok(ApiResponse::success(FriendCuDto::from(&item)))
}

/// POST /friends/createitem
pub async fn create_item(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Json(dto): Json<FriendCuDto>,
) -> ApiResult<Friend> {
    let item = state
        .friends
        .create_friend(&usr, &dto)
        .await
        .map_err(|e| ApiError::bad_request(format!("Could not create. Error {}", e)))?;
    tracing::info!("item {} created", item.friend_id);
    Ok(ApiResponse::success(item))
}

/// PUT /friends/updateitem/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(dto): Json<FriendCuDto>,
) -> ApiResult<Friend> {
    let id = params::parse_uuid("id", Some(&id))?;
    if dto.friend_id != Some(id) {
        return Err(ApiError::bad_request("Could not update. Error Id mismatch"));
    }

    let item = state
        .friends
        .update_friend(&usr, &dto)
        .await
        .map_err(|e| ApiError::bad_request(format!("Could not update. Error {}", e)))?;
    tracing::info!("item {} updated", id);
    Ok(ApiResponse::success(item))
}

/// DELETE /friends/deleteitem/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Path(id): Path<String>,
) -> ApiResult<Friend> {
    let id = params::parse_uuid("id", Some(&id))?;

    let item = state
        .friends
        .delete_friend(&usr, id)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    tracing::info!("item {} deleted", id);
    Ok(ApiResponse::success(item))
}
