/// Response caching
///
/// Two layers sit between the app and the network:
/// - An in-memory TTL cache for API JSON with an injectable clock (ttl.rs)
/// - A SQLite store of response bodies (store.rs) used by the
///   origin-keyed network-first / cache-first policies (policy.rs)

pub mod policy;
pub mod store;
pub mod ttl;

pub use policy::{CachingFetcher, OriginRules};
pub use store::ResponseStore;
pub use ttl::{Clock, ResponseCache, SystemClock};
