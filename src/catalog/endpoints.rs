//! URL builders for the catalog API.

use crate::browser::types::{CategoryType, PageWindow};

#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full taxonomy document (all five category types at once).
    pub fn tags(&self) -> String {
        format!("{}/stations/tags", self.base_url)
    }

    pub fn stations_by_tag(&self, category: CategoryType, value: &str, window: &PageWindow) -> String {
        format!(
            "{}/stations/by-tag?systemName={}&tagType={}&count={}&offset={}",
            self.base_url,
            urlencoding::encode(value),
            category.tag_type(),
            window.size,
            window.page_number
        )
    }

    pub fn search(&self, query: &str, window: &PageWindow) -> String {
        format!(
            "{}/stations/search?query={}&count={}&offset={}",
            self.base_url,
            encode_query(query),
            window.size,
            window.page_number
        )
    }

    pub fn station_details(&self, station_id: &str) -> String {
        format!(
            "{}/stations/details?stationIds={}",
            self.base_url,
            urlencoding::encode(station_id)
        )
    }
}

/// Percent-encodes a search string, with spaces as `+`.
pub fn encode_query(query: &str) -> String {
    urlencoding::encode(query).replace("%20", "+")
}

/// Absolute URL of a cover reference produced by the transformer.
pub fn asset_url(asset_base: &str, id: &str) -> String {
    format!("{asset_base}{id}")
}
