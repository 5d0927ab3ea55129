//! The radio.net browser: turns virtual paths into catalog calls and catalog
//! JSON into media lists, and performs actions on stations.

pub mod action;
pub mod cache;
pub mod query;
pub mod transform;
pub mod types;

use crate::catalog::{Endpoints, Transport, endpoints};
use crate::config::{BrowserConfig, CatalogConfig};
use crate::error::{BrowseError, Result};
use crate::library::LibrarySink;
use crate::playlist::PlaylistSink;
use action::Dispatcher;
use cache::TaxonomyCache;
use std::sync::Arc;
use tracing::debug;
use transform::Transformer;
use types::{
    ActionType, BrowserInfo, BrowserRequest, BrowserResponse, CategoryType, MediaItem,
    MediaListResponse, PageRequest, ResolvedIntent,
};

pub struct RadioBrowser<T> {
    info: BrowserInfo,
    transport: T,
    endpoints: Endpoints,
    asset_base: String,
    player_id: String,
    taxonomy: TaxonomyCache,
    playlist: Arc<dyn PlaylistSink>,
    library: Arc<dyn LibrarySink>,
}

impl<T: Transport> RadioBrowser<T> {
    pub fn new(
        transport: T,
        catalog: &CatalogConfig,
        browser: &BrowserConfig,
        playlist: Arc<dyn PlaylistSink>,
        library: Arc<dyn LibrarySink>,
    ) -> Self {
        Self {
            info: BrowserInfo {
                id: browser.browser_id.clone(),
                name: "Radio.net",
                description: "Browse in Radio.net directory",
                icon: "fa:broadcast-tower",
                supports_search: true,
            },
            transport,
            endpoints: Endpoints::new(catalog.base_url.as_str()),
            asset_base: catalog.asset_url.clone(),
            player_id: browser.player_id.clone(),
            taxonomy: TaxonomyCache::new(),
            playlist,
            library,
        }
    }

    pub fn info(&self) -> &BrowserInfo {
        &self.info
    }

    /// Absolute URL of a cover reference found in a listing.
    pub fn get_asset(&self, id: &str) -> String {
        endpoints::asset_url(&self.asset_base, id)
    }

    #[cfg(test)]
    pub fn taxonomy(&self) -> &TaxonomyCache {
        &self.taxonomy
    }

    pub async fn handle_request(&self, request: BrowserRequest) -> Result<Option<BrowserResponse>> {
        match request {
            BrowserRequest::GetMediaList {
                query,
                offset,
                count,
            } => {
                let list = self.get_media_list(&query, offset, count).await?;
                Ok(Some(BrowserResponse::MediaList(list)))
            }
            BrowserRequest::DoAction { path, action } => {
                self.do_action(&path, action).await?;
                Ok(None)
            }
        }
    }

    pub async fn get_media_list(
        &self,
        query: &str,
        offset: u32,
        count: u32,
    ) -> Result<MediaListResponse> {
        let page = PageRequest::new(offset, count)?;

        match query::resolve(query, page)? {
            ResolvedIntent::Root => Ok(root_list()),
            ResolvedIntent::CategoryList { category } => {
                self.category_list(category, page).await
            }
            ResolvedIntent::StationList {
                category,
                value,
                page,
            } => {
                let url = self
                    .endpoints
                    .stations_by_tag(category, &value, &page.window()?);
                self.fetch_list(&url, page).await
            }
            ResolvedIntent::Search { query, page } => {
                let url = self.endpoints.search(&query, &page.window()?);
                self.fetch_list(&url, page).await
            }
        }
    }

    async fn category_list(
        &self,
        category: CategoryType,
        page: PageRequest,
    ) -> Result<MediaListResponse> {
        let url = self.endpoints.tags();
        let url = url.as_str();
        let document = self
            .taxonomy
            .get_or_fetch(|| async move {
                debug!(%url, "fetch taxonomy");
                let doc = self.transport.fetch_json(url).await?;
                if !doc.is_object() {
                    return Err(BrowseError::MalformedUpstreamResponse(
                        "taxonomy is not an object".into(),
                    ));
                }
                Ok(doc)
            })
            .await?;

        let entries = document
            .get(category.key())
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                BrowseError::MalformedUpstreamResponse(format!("no {} in taxonomy", category.key()))
            })?;
        Ok(self.transformer().categories(entries, page))
    }

    async fn fetch_list(&self, url: &str, page: PageRequest) -> Result<MediaListResponse> {
        debug!(%url, "get_media_list");
        let payload = self.transport.fetch_json(url).await?;
        self.transformer().transform(&payload, page)
    }

    pub async fn do_action(&self, path: &str, action: ActionType) -> Result<()> {
        let request = query::resolve_action(path, action)?;

        let url = self.endpoints.station_details(&request.station_id);
        debug!(%url, action = action.as_str(), "resolve station");
        let payload = self.transport.fetch_json(&url).await?;
        let detail = action::parse_station_detail(&payload, &self.asset_base)?;

        self.dispatcher().dispatch(&request, detail)
    }

    fn transformer(&self) -> Transformer<'_> {
        Transformer {
            asset_base: &self.asset_base,
            browser_id: &self.info.id,
            library: self.library.as_ref(),
        }
    }

    fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher {
            player_id: &self.player_id,
            browser_id: &self.info.id,
            playlist: self.playlist.as_ref(),
            library: self.library.as_ref(),
        }
    }
}

/// The five category types, in a fixed order.
fn root_list() -> MediaListResponse {
    let items = CategoryType::ALL
        .into_iter()
        .map(|c| {
            MediaItem::folder(c.key(), c.display_name()).with_cover(Some(c.icon().to_string()))
        })
        .collect();
    MediaListResponse::new(items, 0)
}
