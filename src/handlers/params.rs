//! Parameter parsing conventions shared by every controller: query values
//! arrive as raw strings; a supplied-but-unparseable value is a 400 carrying
//! the parse failure detail, never a silent fallback to the default.

use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Query shape of every paged Read operation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadQuery {
    pub seeded: Option<String>,
    pub flat: Option<String>,
    pub filter: Option<String>,
    pub page_nr: Option<String>,
    pub page_size: Option<String>,
}

/// Query shape of ReadItem / ReadItemDto.
#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    pub id: Option<String>,
    pub flat: Option<String>,
}

pub fn parse_bool(name: &str, value: Option<&str>, default: bool) -> Result<bool, ApiError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| ApiError::bad_request(format!("{}: {}", name, e))),
    }
}

pub fn parse_usize(name: &str, value: Option<&str>, default: usize) -> Result<usize, ApiError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| ApiError::bad_request(format!("{}: {}", name, e))),
    }
}

pub fn parse_uuid(name: &str, value: Option<&str>) -> Result<Uuid, ApiError> {
    let raw = value.ok_or_else(|| ApiError::bad_request(format!("{} is required", name)))?;
    raw.parse()
        .map_err(|e| ApiError::bad_request(format!("{}: {}", name, e)))
}

/// The core's only text normalization rule: trim and lower-case the filter
/// before it reaches the service. A blank filter counts as absent.
pub fn normalize_filter(filter: Option<String>) -> Option<String> {
    filter
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty())
}
