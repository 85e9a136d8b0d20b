/// Search results feed
///
/// Tracks what was searched, the deduplicated photo list, and the
/// loading / error flags the home screen renders. Every request is issued
/// as a [`FetchTicket`]; a result whose ticket belongs to an older
/// generation is ignored so a slow response can't overwrite a newer search.

use super::data::{PhotoList, PhotosPage, SearchParams};
use crate::api::ApiError;

/// Monotonic counter identifying the current "owner" of async results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First page of a new query (replaces the list)
    Search,
    /// Following page of the current query (appends)
    LoadMore,
}

/// Identifies one in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: Generation,
    pub kind: FetchKind,
    pub params: SearchParams,
}

/// What applying a result did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedUpdate {
    /// The list was replaced by a new search
    Replaced,
    /// This many new photos were appended
    Appended(usize),
    /// The search worked but found nothing
    Empty,
    /// The request failed; the message is now in `error()`
    Failed,
    /// The ticket was from an older generation and was dropped
    Stale,
}

#[derive(Debug, Clone)]
pub struct PhotoFeed {
    params: SearchParams,
    photos: PhotoList,
    total_results: u64,
    loading: bool,
    loading_more: bool,
    error: Option<String>,
    empty: bool,
    generation: Generation,
    /// Last request that failed, kept for `retry`
    failed: Option<FetchKind>,
    /// The server ran out of pages before `total_results` was reached
    exhausted: bool,
}

impl PhotoFeed {
    pub fn new(query: impl Into<String>, per_page: u32) -> Self {
        Self {
            params: SearchParams::first_page(query, per_page),
            photos: PhotoList::new(),
            total_results: 0,
            loading: false,
            loading_more: false,
            error: None,
            empty: false,
            generation: Generation::default(),
            failed: None,
            exhausted: false,
        }
    }

    pub fn photos(&self) -> &PhotoList {
        &self.photos
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }


    /// More pages exist for the current query.
    ///
    /// Duplicate ids can keep the list short of `total_results` forever, so
    /// a page without a `next_page` link or without new photos also ends it.
    pub fn has_more(&self) -> bool {
        !self.exhausted && (self.photos.len() as u64) < self.total_results
    }

    /// Start a new search. Blank queries are ignored.
    pub fn begin_search(&mut self, query: &str) -> Option<FetchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.generation = self.generation.next();
        self.params = SearchParams::first_page(query, self.params.per_page);
        self.loading = true;
        self.loading_more = false;
        self.error = None;
        self.empty = false;
        self.failed = None;
        self.exhausted = false;

        Some(FetchTicket {
            generation: self.generation,
            kind: FetchKind::Search,
            params: self.params.clone(),
        })
    }

    /// Ask for the next page, unless one is already on its way or there's nothing left.
    ///
    /// After a failed search only `retry` can move on; paging would fetch
    /// page 2 of a query whose page 1 never arrived.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if self.loading || self.loading_more || !self.has_more() {
            return None;
        }
        if self.failed == Some(FetchKind::Search) {
            return None;
        }

        self.loading_more = true;
        self.error = None;
        self.failed = None;

        Some(FetchTicket {
            generation: self.generation,
            kind: FetchKind::LoadMore,
            params: self.params.next_page(),
        })
    }

    /// Re-issue whatever failed last
    pub fn retry(&mut self) -> Option<FetchTicket> {
        match self.failed {
            Some(FetchKind::LoadMore) if !self.photos.is_empty() => self.begin_load_more(),
            _ => {
                let query = self.params.query.clone();
                self.begin_search(&query)
            }
        }
    }

    /// Apply the outcome of a request
    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<PhotosPage, ApiError>) -> FeedUpdate {
        if ticket.generation != self.generation {
            tracing::debug!("🗑️  Dropping stale result for \"{}\" page {}", ticket.params.query, ticket.params.page);
            return FeedUpdate::Stale;
        }

        match ticket.kind {
            FetchKind::Search => self.loading = false,
            FetchKind::LoadMore => self.loading_more = false,
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::error!("❌ Fetching \"{}\" page {} failed: {}", ticket.params.query, ticket.params.page, err);
                self.error = Some(err.to_user_message());
                self.failed = Some(ticket.kind);
                if ticket.kind == FetchKind::Search {
                    // The old query's results don't belong to the new one
                    self.photos = PhotoList::new();
                    self.total_results = 0;
                    self.params = ticket.params.clone();
                }
                return FeedUpdate::Failed;
            }
        };

        self.total_results = page.total_results;
        self.exhausted = page.next_page.is_none();
        match ticket.kind {
            FetchKind::Search => {
                self.photos.replace(page.photos);
                self.params = ticket.params.clone();
                if self.photos.is_empty() {
                    self.empty = true;
                    let empty = ApiError::EmptyResult {
                        query: ticket.params.query.clone(),
                    };
                    tracing::info!("🕳️  {}", empty);
                    return FeedUpdate::Empty;
                }
                FeedUpdate::Replaced
            }
            FetchKind::LoadMore => {
                let added = self.photos.extend(page.photos);
                self.params = ticket.params.clone();
                if added == 0 {
                    tracing::debug!("🛑 Page {} of \"{}\" added nothing, stopping", ticket.params.page, ticket.params.query);
                    self.exhausted = true;
                }
                FeedUpdate::Appended(added)
            }
        }
    }

    /// Message shown by the empty state
    pub fn empty_message(&self) -> Option<String> {
        self.empty.then(|| {
            ApiError::EmptyResult {
                query: self.params.query.clone(),
            }
            .to_user_message()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::square;

    /// A page of square photos; `next_page` is set while ids remain below `total`
    fn page(ids: std::ops::RangeInclusive<u64>, total: u64) -> PhotosPage {
        let next_page = (*ids.end() < total).then(|| "https://api.pexels.com/v1/search/?page=next".to_string());
        PhotosPage {
            photos: ids.map(square).collect(),
            total_results: total,
            page: 1,
            per_page: 20,
            next_page,
        }
    }

    #[test]
    fn test_search_then_load_more() {
        let mut feed = PhotoFeed::new("nature", 20);
        let ticket = feed.begin_search("nature").unwrap();
        assert!(feed.is_loading());
        assert_eq!(ticket.params.page, 1);

        assert_eq!(feed.apply(&ticket, Ok(page(1..=20, 45))), FeedUpdate::Replaced);
        assert!(!feed.is_loading());
        assert!(feed.has_more());

        let more = feed.begin_load_more().unwrap();
        assert_eq!(more.params.page, 2);
        assert!(feed.is_loading_more());
        // Guarded while in flight
        assert!(feed.begin_load_more().is_none());

        // Page overlaps the previous one by one photo
        assert_eq!(feed.apply(&more, Ok(page(20..=40, 45))), FeedUpdate::Appended(20));
        assert_eq!(feed.photos().len(), 40);
        assert_eq!(feed.params.page, 2);
        assert!(!feed.is_loading_more());
    }

    #[test]
    fn test_blank_query_ignored() {
        let mut feed = PhotoFeed::new("nature", 20);
        assert!(feed.begin_search("   ").is_none());
        assert!(!feed.is_loading());
    }

    #[test]
    fn test_stale_search_result_dropped() {
        let mut feed = PhotoFeed::new("nature", 20);
        let first = feed.begin_search("cats").unwrap();
        let second = feed.begin_search("dogs").unwrap();

        assert_eq!(feed.apply(&first, Ok(page(1..=5, 5))), FeedUpdate::Stale);
        assert!(feed.photos().is_empty());
        assert!(feed.is_loading());

        assert_eq!(feed.apply(&second, Ok(page(6..=8, 3))), FeedUpdate::Replaced);
        assert_eq!(feed.params.query, "dogs");
        assert_eq!(feed.photos().len(), 3);
    }

    #[test]
    fn test_load_more_failure_keeps_list() {
        let mut feed = PhotoFeed::new("nature", 20);
        let ticket = feed.begin_search("nature").unwrap();
        feed.apply(&ticket, Ok(page(1..=20, 100)));

        let more = feed.begin_load_more().unwrap();
        let update = feed.apply(&more, Err(ApiError::network(503, "Service Unavailable")));
        assert_eq!(update, FeedUpdate::Failed);
        assert_eq!(feed.photos().len(), 20);
        assert!(!feed.is_loading_more());
        assert_eq!(feed.error(), Some("Service Unavailable"));
        // The page number didn't advance
        assert_eq!(feed.params.page, 1);

        let retry = feed.retry().unwrap();
        assert_eq!(retry.kind, FetchKind::LoadMore);
        assert_eq!(retry.params.page, 2);
        assert_eq!(feed.error(), None);
    }

    #[test]
    fn test_search_failure_retries_search() {
        let mut feed = PhotoFeed::new("nature", 20);
        let ticket = feed.begin_search("nature").unwrap();
        feed.apply(&ticket, Err(ApiError::network(401, "Unauthorized")));
        assert_eq!(feed.error(), Some("Unauthorized"));

        let retry = feed.retry().unwrap();
        assert_eq!(retry.kind, FetchKind::Search);
        assert_eq!(retry.params.query, "nature");
    }

    #[test]
    fn test_empty_result() {
        let mut feed = PhotoFeed::new("nature", 20);
        let ticket = feed.begin_search("qwertyuiop").unwrap();
        assert_eq!(feed.apply(&ticket, Ok(page(1..=0, 0))), FeedUpdate::Empty);
        assert!(feed.empty);
        assert!(!feed.has_more());
        assert_eq!(feed.empty_message().as_deref(), Some("No photos found for \"qwertyuiop\""));
        assert!(feed.error().is_none());
    }

    #[test]
    fn test_no_load_more_when_exhausted_or_searching() {
        let mut feed = PhotoFeed::new("nature", 20);
        assert!(feed.begin_load_more().is_none());

        let ticket = feed.begin_search("nature").unwrap();
        assert!(feed.begin_load_more().is_none());
        feed.apply(&ticket, Ok(page(1..=3, 3)));
        assert!(feed.begin_load_more().is_none());
    }

    #[test]
    fn test_load_more_from_old_search_is_stale() {
        let mut feed = PhotoFeed::new("nature", 20);
        let ticket = feed.begin_search("nature").unwrap();
        feed.apply(&ticket, Ok(page(1..=20, 100)));
        let more = feed.begin_load_more().unwrap();

        let fresh = feed.begin_search("ocean").unwrap();
        assert_eq!(feed.apply(&more, Ok(page(21..=40, 100))), FeedUpdate::Stale);
        assert_eq!(feed.apply(&fresh, Ok(page(50..=51, 2))), FeedUpdate::Replaced);
        assert_eq!(feed.photos().len(), 2);
    }

    #[test]
    fn test_failed_search_drops_previous_results() {
        let mut feed = PhotoFeed::new("nature", 20);
        let cats = feed.begin_search("cats").unwrap();
        feed.apply(&cats, Ok(page(1..=20, 100)));
        assert!(feed.has_more());

        let dogs = feed.begin_search("dogs").unwrap();
        let update = feed.apply(&dogs, Err(ApiError::network(503, "Service Unavailable")));
        assert_eq!(update, FeedUpdate::Failed);

        // No cat photos left under the "dogs" query, and no paging onto them
        assert!(feed.photos().is_empty());
        assert_eq!(feed.total_results, 0);
        assert_eq!(feed.params.query, "dogs");
        assert!(!feed.has_more());
        assert!(feed.begin_load_more().is_none());
        assert_eq!(feed.error(), Some("Service Unavailable"));

        let retry = feed.retry().unwrap();
        assert_eq!(retry.kind, FetchKind::Search);
        assert_eq!(retry.params.query, "dogs");
        assert_eq!(retry.params.page, 1);
    }

    #[test]
    fn test_load_more_blocked_while_search_failed() {
        let mut feed = PhotoFeed::new("nature", 20);
        let first = feed.begin_search("cats").unwrap();
        feed.apply(&first, Ok(page(1..=20, 100)));

        // A retried search that fails again must not unlock paging either
        let second = feed.begin_search("cats").unwrap();
        feed.apply(&second, Err(ApiError::network(500, "Internal Server Error")));
        assert!(feed.begin_load_more().is_none());
        assert!(!feed.is_loading_more());
        assert!(feed.error().is_some());
    }

    #[test]
    fn test_page_without_new_photos_ends_paging() {
        let mut feed = PhotoFeed::new("nature", 20);
        let ticket = feed.begin_search("nature").unwrap();
        feed.apply(&ticket, Ok(page(1..=20, 100)));

        let more = feed.begin_load_more().unwrap();
        // Every id on page 2 was already on page 1
        assert_eq!(feed.apply(&more, Ok(page(1..=20, 100))), FeedUpdate::Appended(0));
        assert!(!feed.has_more());
        assert!(feed.begin_load_more().is_none());

        // A new search starts fresh
        let again = feed.begin_search("nature").unwrap();
        feed.apply(&again, Ok(page(1..=20, 100)));
        assert!(feed.has_more());
    }

    #[test]
    fn test_missing_next_page_ends_paging() {
        let mut feed = PhotoFeed::new("nature", 20);
        let ticket = feed.begin_search("nature").unwrap();
        let mut last = page(1..=20, 100);
        last.next_page = None;
        feed.apply(&ticket, Ok(last));

        assert_eq!(feed.photos().len(), 20);
        assert!(!feed.has_more());
        assert!(feed.begin_load_more().is_none());
    }
}
