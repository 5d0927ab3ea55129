//! Errors raised while browsing the catalog or dispatching actions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("unsupported category type: {0}")]
    UnsupportedCategory(String),

    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("catalog unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("malformed catalog response: {0}")]
    MalformedUpstreamResponse(String),

    #[error("library error: {0}")]
    Library(String),
}

impl From<reqwest::Error> for BrowseError {
    fn from(e: reqwest::Error) -> Self {
        BrowseError::UpstreamUnavailable(e.to_string())
    }
}

impl From<rusqlite::Error> for BrowseError {
    fn from(e: rusqlite::Error) -> Self {
        BrowseError::Library(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BrowseError>;
