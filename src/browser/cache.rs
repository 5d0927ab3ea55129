use crate::error::Result;
use serde_json::Value;
use std::future::Future;
use tokio::sync::OnceCell;

/// Full category taxonomy, fetched once per browser and kept for its lifetime.
///
/// One document carries the values of every category type, so the first
/// category listing seeds all later ones.
#[derive(Debug, Default)]
pub struct TaxonomyCache {
    document: OnceCell<Value>,
}

impl TaxonomyCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn get(&self) -> Option<&Value> {
        self.document.get()
    }

    #[cfg(test)]
    pub fn is_populated(&self) -> bool {
        self.document.initialized()
    }

    /// Returns the cached document, running `fetch` only when empty.
    ///
    /// Concurrent callers wait on the first fetch; a failed fetch leaves the
    /// cache empty so the next request tries again.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<&Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        self.document.get_or_try_init(fetch).await
    }
}
