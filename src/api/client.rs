use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::{Arc, Mutex};

use super::error::{ApiError, FALLBACK_STATUS};
use crate::cache::ttl::cache_key;
use crate::cache::{CachingFetcher, Clock, OriginRules, ResponseCache, ResponseStore};
use crate::config::Config;
use crate::perf::{Stopwatch, SLOW_RESPONSE};
use crate::state::data::{Photo, PhotoId, PhotosPage, SearchParams};

/// Anything that can provide photos to the feed and details view
pub trait PhotoSource {
    /// One page of results for a query
    fn search(&self, params: SearchParams) -> impl Future<Output = Result<PhotosPage, ApiError>> + Send;

    /// A single photo by id
    fn get_by_id(&self, id: PhotoId) -> impl Future<Output = Result<Photo, ApiError>> + Send;

    /// Raw bytes of an image from the CDN
    fn fetch_image(&self, url: String) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;
}

/// Client for the Pexels v1 API
#[derive(Debug)]
pub struct PexelsClient {
    base_url: String,
    fetcher: CachingFetcher,
    memory: Mutex<ResponseCache>,
}

impl PexelsClient {
    pub fn new(config: &Config, store: ResponseStore, clock: Arc<dyn Clock>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ApiError::network(FALLBACK_STATUS, "API key contains invalid characters"))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let rules = OriginRules::new(&config.api_url, &config.image_origin);
        let fetcher = CachingFetcher::new(http, store, rules, clock.clone());
        let ttl = chrono::Duration::from_std(config.cache_ttl).unwrap_or_else(|_| chrono::Duration::minutes(5));

        Ok(Self::with_parts(&config.api_url, fetcher, ResponseCache::new(ttl, clock)))
    }

    pub fn with_parts(base_url: &str, fetcher: CachingFetcher, memory: ResponseCache) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            fetcher,
            memory: Mutex::new(memory),
        }
    }

    fn memory(&self) -> std::sync::MutexGuard<'_, ResponseCache> {
        self.memory.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sweep expired in-memory responses
    pub fn purge_expired(&self) -> usize {
        let purged = self.memory().purge_expired();
        if purged > 0 {
            tracing::debug!("🧹 Purged {} expired responses", purged);
        }
        purged
    }

    /// Drop old bodies from the on-disk store
    pub fn prune_store(&self, max_age: std::time::Duration) -> usize {
        let max_age = chrono::Duration::from_std(max_age).unwrap_or_else(|_| chrono::Duration::days(7));
        self.fetcher.prune(max_age)
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url, path);
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        url.map_err(|e| ApiError::network(FALLBACK_STATUS, format!("Invalid request URL {raw}: {e}")))
    }

    /// GET a JSON resource, answering from the in-memory cache when possible
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: Vec<(&'static str, String)>) -> Result<T, ApiError> {
        let key = cache_key(path, &params);
        let cached = self.memory().get(&key).map(<[u8]>::to_vec);
        if let Some(body) = cached {
            match serde_json::from_slice(&body) {
                Ok(value) => {
                    tracing::debug!("⚡ Cache hit: {}", key);
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!("⚠️  Dropping unreadable cached response {}: {}", key, e);
                    self.memory().evict(&key);
                }
            }
        }

        let url = self.endpoint(path, &params)?;
        let watch = Stopwatch::start(format!("GET {path}"));
        let body = self.fetcher.fetch(url.as_str()).await;
        watch.finish_with_limit(SLOW_RESPONSE);

        let body = body?;
        let value = serde_json::from_slice(&body)?;
        self.memory().set(key, body);
        Ok(value)
    }
}

impl PhotoSource for PexelsClient {
    async fn search(&self, params: SearchParams) -> Result<PhotosPage, ApiError> {
        tracing::info!("🔍 Searching \"{}\" (page {})", params.query, params.page);
        let page: PhotosPage = self.get_json("/search", params.to_query_pairs()).await?;
        tracing::info!(
            "📷 Page {} of \"{}\": {} photos, {} total",
            params.page,
            params.query,
            page.photos.len(),
            page.total_results
        );
        Ok(page)
    }

    async fn get_by_id(&self, id: PhotoId) -> Result<Photo, ApiError> {
        if id.0 == 0 {
            return Err(ApiError::InvalidId);
        }
        self.get_json(&format!("/photos/{id}"), Vec::new()).await
    }

    async fn fetch_image(&self, url: String) -> Result<Vec<u8>, ApiError> {
        self.fetcher.fetch(&url).await
    }
}
