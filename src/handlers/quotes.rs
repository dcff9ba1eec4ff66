use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use crate::auth::SessionUser;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{Quote, QuoteCuDto, RespPageDto};
use crate::AppState;

use super::params::{self, ItemQuery, ReadQuery};

/// GET /quotes/read
pub async fn read(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Query(q): Query<ReadQuery>,
) -> ApiResult<RespPageDto<Quote>> {
    let seeded = params::parse_bool("seeded", q.seeded.as_deref(), true)?;
    let flat = params::parse_bool("flat", q.flat.as_deref(), true)?;
    let page_nr = params::parse_usize("pageNr", q.page_nr.as_deref(), 0)?;
    let page_size = params::parse_usize("pageSize", q.page_size.as_deref(), 10)?;
    let filter = params::normalize_filter(q.filter);

    let page = state
        .friends
        .read_quotes(&usr, seeded, flat, filter.as_deref(), page_nr, page_size)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(ApiResponse::success(page))
}

/// GET /quotes/readitem
pub async fn read_item(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Query(q): Query<ItemQuery>,
) -> ApiResult<Quote> {
    let id = params::parse_uuid("id", q.id.as_deref())?;
    let flat = params::parse_bool("flat", q.flat.as_deref(), false)?;

    let item = state
        .friends
        .read_quote(&usr, id, flat)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Item with id {} does not exist", id)))?;
    Ok(ApiResponse::success(item))
}

/// GET /quotes/readitemdto
pub async fn read_item_dto(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Query(q): Query<ItemQuery>,
) -> ApiResult<QuoteCuDto> {
    let id = params::parse_uuid("id", q.id.as_deref())?;

    let item = state
        .friends
        .read_quote(&usr, id, false)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("Item with id {} does not exist", id)))?;
    Ok(ApiResponse::success(QuoteCuDto::from(&item)))
}

/// POST /quotes/createitem
pub async fn create_item(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Json(dto): Json<QuoteCuDto>,
) -> ApiResult<Quote> {
    let item = state
        .friends
        .create_quote(&usr, &dto)
        .await
        .map_err(|e| ApiError::bad_request(format!("Could not create. Error {}", e)))?;
    tracing::info!("item {} created", item.quote_id);
    Ok(ApiResponse::success(item))
}

/// PUT /quotes/updateitem/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(dto): Json<QuoteCuDto>,
) -> ApiResult<Quote> {
    let id = params::parse_uuid("id", Some(&id))?;
    if dto.quote_id != Some(id) {
        return Err(ApiError::bad_request("Could not update. Error Id mismatch"));
    }

    let item = state
        .friends
        .update_quote(&usr, &dto)
        .await
        .map_err(|e| ApiError::bad_request(format!("Could not update. Error {}", e)))?;
    tracing::info!("item {} updated", id);
    Ok(ApiResponse::success(item))
}

/// DELETE /quotes/deleteitem/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(usr): Extension<SessionUser>,
    Path(id): Path<String>,
) -> ApiResult<Quote> {
    let id = params::parse_uuid("id", Some(&id))?;

    let item = state
        .friends
        .delete_quote(&usr, id)
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    tracing::info!("item {} deleted", id);
    Ok(ApiResponse::success(item))
}
