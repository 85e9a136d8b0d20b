/// Origin-keyed caching in front of the HTTP client
///
/// - API origin: network first, fall back to the stored body when offline
/// - Image CDN origin: serve the stored body, only hit the network on a miss
/// - Everything else: straight to the network

use reqwest::Url;
use std::sync::{Arc, Mutex, MutexGuard};

use super::store::ResponseStore;
use super::ttl::Clock;
use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    NetworkFirst,
    CacheFirst,
    NetworkOnly,
}

/// Which origins get which policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginRules {
    api_origin: String,
    image_origin: String,
}

/// `scheme://host[:port]` of a URL, or `None` if it doesn't parse
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

impl OriginRules {
    pub fn new(api_url: &str, image_url: &str) -> Self {
        Self {
            api_origin: origin_of(api_url).unwrap_or_default(),
            image_origin: origin_of(image_url).unwrap_or_default(),
        }
    }

    pub fn policy_for(&self, url: &str) -> CachePolicy {
        match origin_of(url) {
            Some(origin) if !self.api_origin.is_empty() && origin == self.api_origin => CachePolicy::NetworkFirst,
            Some(origin) if !self.image_origin.is_empty() && origin == self.image_origin => CachePolicy::CacheFirst,
            _ => CachePolicy::NetworkOnly,
        }
    }
}

/// HTTP GETs with the origin rules applied
#[derive(Debug, Clone)]
pub struct CachingFetcher {
    http: reqwest::Client,
    store: Arc<Mutex<ResponseStore>>,
    rules: OriginRules,
    clock: Arc<dyn Clock>,
}

impl CachingFetcher {
    pub fn new(http: reqwest::Client, store: ResponseStore, rules: OriginRules, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            store: Arc::new(Mutex::new(store)),
            rules,
            clock,
        }
    }

    fn lock_store(&self) -> MutexGuard<'_, ResponseStore> {
        // A panic while holding the lock can't leave the connection half-written
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stored body for `url`; storage errors count as a miss
    fn stored(&self, url: &str) -> Option<Vec<u8>> {
        match self.lock_store().get(url) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("⚠️  Cache read failed for {}: {}", url, e);
                None
            }
        }
    }

    fn remember(&self, url: &str, body: &[u8]) {
        if let Err(e) = self.lock_store().put(url, body, self.clock.now()) {
            tracing::warn!("⚠️  Cache write failed for {}: {}", url, e);
        }
    }

    /// Drop stored bodies older than `max_age`
    pub fn prune(&self, max_age: chrono::Duration) -> usize {
        let cutoff = self.clock.now() - max_age;
        match self.lock_store().prune_older_than(cutoff) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("⚠️  Cache prune failed: {}", e);
                0
            }
        }
    }

    async fn network(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(ApiError::network(status.as_u16(), message));
        }
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// GET `url` using the policy for its origin
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        match self.rules.policy_for(url) {
            CachePolicy::NetworkFirst => match self.network(url).await {
                Ok(body) => {
                    self.remember(url, &body);
                    Ok(body)
                }
                Err(err) => match self.stored(url) {
                    Some(body) => {
                        tracing::warn!("📦 Network failed ({}), serving cached {}", err, url);
                        Ok(body)
                    }
                    None => Err(err),
                },
            },
            CachePolicy::CacheFirst => {
                if let Some(body) = self.stored(url) {
                    return Ok(body);
                }
                let body = self.network(url).await?;
                self.remember(url, &body);
                Ok(body)
            }
            CachePolicy::NetworkOnly => self.network(url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ttl::SystemClock;

    // Nothing listens on the discard port, so every request fails fast
    const DEAD_API: &str = "http://127.0.0.1:9/v1";
    const DEAD_IMAGES: &str = "http://127.0.0.1:10";

    fn fetcher() -> CachingFetcher {
        CachingFetcher::new(
            reqwest::Client::new(),
            ResponseStore::open_in_memory().unwrap(),
            OriginRules::new(DEAD_API, DEAD_IMAGES),
            Arc::new(SystemClock),
        )
    }

    #[test]
    fn test_policy_by_origin() {
        let rules = OriginRules::new("https://api.pexels.com/v1", "https://images.pexels.com");
        assert_eq!(rules.policy_for("https://api.pexels.com/v1/search?query=a"), CachePolicy::NetworkFirst);
        assert_eq!(rules.policy_for("https://images.pexels.com/photos/1/a.jpeg?h=350"), CachePolicy::CacheFirst);
        assert_eq!(rules.policy_for("http://api.pexels.com/v1/search"), CachePolicy::NetworkOnly);
        assert_eq!(rules.policy_for("https://example.com/a.png"), CachePolicy::NetworkOnly);
        assert_eq!(rules.policy_for("not a url"), CachePolicy::NetworkOnly);
    }

    #[test]
    fn test_origin_of() {
        assert_eq!(origin_of("https://api.pexels.com/v1/x").as_deref(), Some("https://api.pexels.com"));
        assert_eq!(origin_of("http://127.0.0.1:9/v1").as_deref(), Some("http://127.0.0.1:9"));
        assert_eq!(origin_of("nope"), None);
    }

    #[tokio::test]
    async fn test_network_first_falls_back_to_store() {
        let fetcher = fetcher();
        let url = format!("{DEAD_API}/search?query=nature");
        fetcher.remember(&url, b"{\"photos\":[]}");

        let body = fetcher.fetch(&url).await.unwrap();
        assert_eq!(body, b"{\"photos\":[]}".to_vec());
    }

    #[tokio::test]
    async fn test_network_first_without_copy_fails() {
        let fetcher = fetcher();
        let err = fetcher.fetch(&format!("{DEAD_API}/photos/1")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_cache_first_serves_stored_image() {
        let fetcher = fetcher();
        let url = format!("{DEAD_IMAGES}/photos/1/a.jpeg");
        fetcher.remember(&url, &[0xFF, 0xD8, 0xFF]);
        assert_eq!(fetcher.fetch(&url).await.unwrap(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_prune() {
        let fetcher = fetcher();
        fetcher.remember("http://127.0.0.1:10/a", b"x");
        assert_eq!(fetcher.prune(chrono::Duration::days(1)), 0);
        assert_eq!(fetcher.prune(chrono::Duration::milliseconds(-1000)), 1);
    }
}
