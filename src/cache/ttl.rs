/// In-memory response cache with a time-to-live
///
/// Entries are keyed by request path plus parameters. Time comes from an
/// injected [`Clock`] so expiry can be tested without sleeping.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Source of "now" for anything that expires
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    body: Vec<u8>,
    stored_at: DateTime<Utc>,
}

/// Cache key for a GET request: the path followed by its parameters, sorted
pub fn cache_key(path: &str, params: &[(&str, String)]) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort();
    let query: Vec<String> = sorted.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{}?{}", path, query.join("&"))
}

#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<String, Entry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    fn is_fresh(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.stored_at < self.ttl
    }

    /// Cached body for `key`, if it hasn't expired
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.body.as_slice())
    }

    pub fn set(&mut self, key: impl Into<String>, body: Vec<u8>) {
        let stored_at = self.clock.now();
        self.entries.insert(key.into(), Entry { body, stored_at });
    }

    /// Remove one entry; returns whether it was present
    pub fn evict(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every expired entry and return how many went
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.stored_at < ttl);
        before - self.entries.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that only moves when told to
    #[derive(Debug)]
    struct ManualClock {
        millis: AtomicI64,
    }

    impl ManualClock {
        fn new(start: DateTime<Utc>) -> Self {
            Self {
                millis: AtomicI64::new(start.timestamp_millis()),
            }
        }

        fn advance(&self, by: Duration) {
            self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
        }
    }

    fn setup() -> (Arc<ManualClock>, ResponseCache) {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()));
        let cache = ResponseCache::new(Duration::minutes(5), clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_get_before_and_after_ttl() {
        let (clock, mut cache) = setup();
        cache.set("/search?query=nature", b"{}".to_vec());
        assert_eq!(cache.get("/search?query=nature"), Some(&b"{}"[..]));

        clock.advance(Duration::minutes(4) + Duration::seconds(59));
        assert!(cache.get("/search?query=nature").is_some());

        clock.advance(Duration::seconds(1));
        assert!(cache.get("/search?query=nature").is_none());
        // Still physically there until purged
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_refreshes_timestamp() {
        let (clock, mut cache) = setup();
        cache.set("a", vec![1]);
        clock.advance(Duration::minutes(3));
        cache.set("a", vec![2]);
        clock.advance(Duration::minutes(3));
        assert_eq!(cache.get("a"), Some(&[2u8][..]));
    }

    #[test]
    fn test_evict() {
        let (_clock, mut cache) = setup();
        cache.set("a", vec![1]);
        assert!(cache.evict("a"));
        assert!(!cache.evict("a"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let (clock, mut cache) = setup();
        cache.set("old", vec![1]);
        clock.advance(Duration::minutes(6));
        cache.set("new", vec![2]);

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new").is_some());
    }

    #[test]
    fn test_cache_key_ignores_param_order() {
        let a = cache_key("/search", &[("query", "cats".into()), ("page", "2".into())]);
        let b = cache_key("/search", &[("page", "2".into()), ("query", "cats".into())]);
        assert_eq!(a, b);
        assert_eq!(a, "/search?page=2&query=cats");
        assert_eq!(cache_key("/photos/1", &[]), "/photos/1?");
    }
}
