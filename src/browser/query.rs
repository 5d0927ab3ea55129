//! Virtual path parsing.
//!
//! Paths have one of four shapes:
//! - `/` for the root folder list
//! - `/<type>` (or `/<type>/`) for the values of one category type
//! - `/<type>/<value>` for the stations tagged with a value
//! - `search:<text>` for a free-text search

use super::types::{ActionRequest, ActionType, CategoryType, PageRequest, ResolvedIntent};
use crate::error::{BrowseError, Result};

pub const SEARCH_PREFIX: &str = "search:";

pub fn resolve(query: &str, page: PageRequest) -> Result<ResolvedIntent> {
    if query == "/" {
        return Ok(ResolvedIntent::Root);
    }

    if let Some(text) = query.strip_prefix(SEARCH_PREFIX) {
        if text.trim().is_empty() {
            return Err(BrowseError::InvalidQuery("empty search".into()));
        }
        return Ok(ResolvedIntent::Search {
            query: text.to_string(),
            page,
        });
    }

    let path = query.strip_prefix('/').unwrap_or(query);
    if path.is_empty() {
        return Err(BrowseError::InvalidQuery(query.to_string()));
    }

    let (key, value) = path.split_once('/').unwrap_or((path, ""));
    if key.is_empty() || value.contains('/') {
        return Err(BrowseError::InvalidQuery(query.to_string()));
    }

    let category = CategoryType::parse(key)?;
    if value.is_empty() {
        return Ok(ResolvedIntent::CategoryList { category });
    }
    Ok(ResolvedIntent::StationList {
        category,
        value: value.to_string(),
        page,
    })
}

/// Extracts the station targeted by an action path.
///
/// The station id is the last path segment, whether the item was reached by
/// browsing or by searching.
pub fn resolve_action(path: &str, action: ActionType) -> Result<ActionRequest> {
    match action {
        ActionType::Play | ActionType::Add | ActionType::SetFavorite | ActionType::UnsetFavorite => {}
        other => return Err(BrowseError::UnsupportedAction(other.as_str().to_string())),
    }

    let path = path.strip_prefix(SEARCH_PREFIX).unwrap_or(path);
    let station_id = match path.rsplit_once('/') {
        Some((_, id)) => id,
        None => path,
    };
    if station_id.is_empty() {
        return Err(BrowseError::InvalidQuery(format!("no station id in {path:?}")));
    }

    Ok(ActionRequest {
        station_id: station_id.to_string(),
        action,
    })
}
