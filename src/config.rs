/// Runtime configuration
///
/// Everything is read from environment variables with the defaults the
/// app ships with:
///   PEXELS_API_KEY (or VITE_PEXELS_API_KEY) - API key, empty if unset
///   PHOTO_GRID_API_URL (default: https://api.pexels.com/v1)
///   PHOTO_GRID_IMAGE_ORIGIN (default: https://images.pexels.com)
///   PHOTO_GRID_QUERY (default: nature)
///   PHOTO_GRID_PER_PAGE (default: 20)
///   PHOTO_GRID_CACHE_DB (default: <user cache dir>/photo-grid/responses.db)

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::ResponseStore;
use crate::layout::GridConfig;

pub const DEFAULT_API_URL: &str = "https://api.pexels.com/v1";
pub const DEFAULT_IMAGE_ORIGIN: &str = "https://images.pexels.com";
pub const DEFAULT_QUERY: &str = "nature";
pub const DEFAULT_PER_PAGE: u32 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub image_origin: String,
    pub default_query: String,
    pub per_page: u32,
    pub request_timeout: Duration,
    /// How long an API response stays valid in memory
    pub cache_ttl: Duration,
    /// How often expired in-memory entries are swept
    pub cache_purge_interval: Duration,
    /// Stored bodies older than this are pruned at startup
    pub store_max_age: Duration,
    pub cache_db: PathBuf,
    pub grid: GridConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            image_origin: DEFAULT_IMAGE_ORIGIN.to_string(),
            default_query: DEFAULT_QUERY.to_string(),
            per_page: DEFAULT_PER_PAGE,
            request_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(5 * 60),
            cache_purge_interval: Duration::from_secs(10 * 60),
            store_max_age: Duration::from_secs(7 * 24 * 60 * 60),
            cache_db: ResponseStore::default_db_path(),
            grid: GridConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let per_page = non_empty("PHOTO_GRID_PER_PAGE")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| (1..=80).contains(n))
            .unwrap_or(defaults.per_page);

        Self {
            api_key: non_empty("PEXELS_API_KEY")
                .or_else(|| non_empty("VITE_PEXELS_API_KEY"))
                .unwrap_or_default(),
            api_url: non_empty("PHOTO_GRID_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            image_origin: non_empty("PHOTO_GRID_IMAGE_ORIGIN").unwrap_or(defaults.image_origin),
            default_query: non_empty("PHOTO_GRID_QUERY").unwrap_or(defaults.default_query),
            per_page,
            cache_db: non_empty("PHOTO_GRID_CACHE_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_db),
            ..defaults
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}
