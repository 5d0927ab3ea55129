use super::{BrowserConfig, CatalogConfig, Config, PathsConfig};

pub const CATALOG_BASE_URL: &str = "https://prod.radio-api.net";
pub const CATALOG_ASSET_URL: &str = "https://static.radio.net/images/broadcasts/";
pub const USER_AGENT: &str = "radionet-browser/0.1 (Android API)";
pub const TIMEOUT_SECS: u64 = 15;

pub const BROWSER_ID: &str = "net.radio.browser";
pub const PLAYER_ID: &str = "com.sparod.radio.player";

pub fn defaults() -> Config {
    Config {
        catalog: CatalogConfig::default(),
        browser: BrowserConfig::default(),
        paths: PathsConfig::default(),
    }
}
