use iced::widget::{column, image, scrollable};
use iced::{window, Element, Size, Subscription, Task, Theme};
use std::sync::Arc;

mod api;
mod cache;
mod config;
mod layout;
mod logging;
mod perf;
mod state;
mod ui;

use api::{ApiError, PexelsClient, PhotoSource};
use cache::{ResponseStore, SystemClock};
use config::Config;
use layout::grid::Phase;
use layout::{MasonryGrid, ScrollMetrics};
use state::data::{Photo, PhotoId, PhotosPage};
use state::details::{DetailsTicket, PhotoDetails};
use state::feed::{FeedUpdate, FetchKind, FetchTicket, PhotoFeed};
use state::images::TileImages;

/// Which page is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Home,
    Details,
}

/// Main application state
struct PhotoGrid {
    config: Config,
    client: Arc<PexelsClient>,
    feed: PhotoFeed,
    grid: MasonryGrid,
    details: PhotoDetails,
    route: Route,
    /// Text currently typed in the search box
    query: String,
    /// Decoded images for tiles near the viewport and the details page
    images: TileImages,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    SearchSubmitted,
    PhotosLoaded(FetchTicket, Result<PhotosPage, ApiError>),
    GridScrolled(scrollable::Viewport),
    WindowResized(Size),
    /// Next animation frame; only subscribed while the grid has work queued
    Frame,
    PhotoClicked(PhotoId),
    DetailsLoaded(DetailsTicket, Result<Photo, ApiError>),
    ImageLoaded(String, Result<Vec<u8>, ApiError>),
    Back,
    Retry,
    PurgeCache,
}

impl PhotoGrid {
    fn new(config: Config, client: Arc<PexelsClient>, deep_link: Option<String>) -> (Self, Task<Message>) {
        let mut feed = PhotoFeed::new(config.default_query.clone(), config.per_page);
        let mut grid = MasonryGrid::new(config.grid.clone());
        grid.request_resize(
            INITIAL_WINDOW.width,
            (INITIAL_WINDOW.height - ui::SEARCH_BAR_HEIGHT).max(0.0),
        );

        let mut tasks = Vec::new();
        if let Some(ticket) = feed.begin_search(&config.default_query) {
            tasks.push(fetch_page(&client, ticket));
        }

        let mut details = PhotoDetails::new();
        let mut route = Route::Home;
        if let Some(raw_id) = deep_link {
            route = Route::Details;
            if let Some(ticket) = details.open(Some(&raw_id)) {
                tasks.push(fetch_details(&client, ticket));
            }
        }

        let pruned = client.prune_store(config.store_max_age);
        tracing::info!(
            "🖼️  Photo grid ready (query \"{}\", {} stale responses pruned)",
            config.default_query,
            pruned
        );

        let app = PhotoGrid {
            query: config.default_query.clone(),
            config,
            client,
            feed,
            grid,
            details,
            route,
            images: TileImages::new(),
        };

        (app, Task::batch(tasks))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(query) => {
                self.query = query;
                Task::none()
            }
            Message::SearchSubmitted => match self.feed.begin_search(&self.query) {
                Some(ticket) => {
                    self.grid.replace_photos(self.feed.photos());
                    self.images.clear();
                    let reset = scrollable::scroll_to(
                        scrollable::Id::new(ui::grid::GRID_SCROLLABLE),
                        scrollable::AbsoluteOffset::default(),
                    );
                    Task::batch([fetch_page(&self.client, ticket), reset])
                }
                None => Task::none(),
            },
            Message::PhotosLoaded(ticket, result) => {
                if apply_page(&mut self.feed, &mut self.grid, &ticket, result) == FeedUpdate::Stale {
                    return Task::none();
                }
                self.release_far_images();
                self.load_visible_images()
            }
            Message::GridScrolled(viewport) => {
                let bounds = viewport.bounds();
                self.grid.request_scroll(ScrollMetrics {
                    width: bounds.width,
                    client_height: bounds.height,
                    scroll_top: viewport.absolute_offset().y,
                    scroll_height: viewport.content_bounds().height,
                });
                Task::none()
            }
            Message::WindowResized(size) => {
                self.grid
                    .request_resize(size.width, (size.height - ui::SEARCH_BAR_HEIGHT).max(0.0));
                Task::none()
            }
            Message::Frame => {
                let outcome = self.grid.on_frame(self.feed.has_more());
                debug_assert_eq!(self.grid.phase(), Phase::Idle);
                let mut tasks = Vec::new();
                if outcome.load_more {
                    match self.feed.begin_load_more() {
                        Some(ticket) => tasks.push(fetch_page(&self.client, ticket)),
                        None => self.grid.settle_pagination(),
                    }
                }
                self.release_far_images();
                tasks.push(self.load_visible_images());
                Task::batch(tasks)
            }
            Message::PhotoClicked(id) => {
                self.route = Route::Details;
                self.grid.cancel_pending();
                let ticket = self.details.open_id(id);
                if let Some(photo) = self.feed.photos().get(id).cloned() {
                    self.details.prefill(&ticket, photo);
                }
                Task::batch([fetch_details(&self.client, ticket), self.load_detail_image()])
            }
            Message::DetailsLoaded(ticket, result) => {
                if self.details.apply(&ticket, result) {
                    self.load_detail_image()
                } else {
                    Task::none()
                }
            }
            Message::ImageLoaded(url, result) => {
                match result {
                    Ok(bytes) => self.images.loaded(url, image::Handle::from_bytes(bytes)),
                    Err(e) => {
                        tracing::warn!("⚠️  Image {} failed: {}", url, e);
                        self.images.failed(&url);
                    }
                }
                Task::none()
            }
            Message::Back => {
                self.details.close();
                self.route = Route::Home;
                // The grid scrollable is rebuilt at the top
                if let Some(container) = self.grid.container() {
                    self.grid.request_scroll(ScrollMetrics {
                        scroll_top: 0.0,
                        ..container
                    });
                }
                Task::none()
            }
            Message::Retry => match self.feed.retry() {
                Some(ticket) => fetch_page(&self.client, ticket),
                None => Task::none(),
            },
            Message::PurgeCache => {
                self.client.purge_expired();
                Task::none()
            }
        }
    }

    /// Let go of decoded tiles that scrolled far out of view
    fn release_far_images(&mut self) {
        let pinned = match self.route {
            Route::Details => self.details.photo().map(Photo::detail_source),
            Route::Home => None,
        };
        let released = self
            .images
            .retain_near(self.feed.photos().as_slice(), self.grid.visible_range(), pinned);
        if released > 0 {
            tracing::debug!("🧹 Released {} tile images ({} decoded)", released, self.images.len());
        }
    }

    /// Request grid images for tiles inside the visible range
    fn load_visible_images(&mut self) -> Task<Message> {
        let range = self.grid.visible_range();
        if range.visible_items == 0 {
            return Task::none();
        }

        let urls: Vec<String> = self
            .feed
            .photos()
            .as_slice()
            .get(range.start_index..=range.end_index)
            .unwrap_or_default()
            .iter()
            .map(|photo| photo.grid_source().to_string())
            .collect();

        Task::batch(urls.into_iter().map(|url| self.fetch_image(url)))
    }

    fn load_detail_image(&mut self) -> Task<Message> {
        match self.details.photo().map(|photo| photo.detail_source().to_string()) {
            Some(url) => self.fetch_image(url),
            None => Task::none(),
        }
    }

    fn fetch_image(&mut self, url: String) -> Task<Message> {
        if !self.images.request(&url) {
            return Task::none();
        }
        let client = Arc::clone(&self.client);
        Task::perform(
            async move {
                let result = client.fetch_image(url.clone()).await;
                (url, result)
            },
            |(url, result)| Message::ImageLoaded(url, result),
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        if self.route == Route::Details {
            let handle = self
                .details
                .photo()
                .and_then(|photo| self.images.get(photo.detail_source()));
            return ui::details::view(&self.details, handle);
        }

        let body = if self.feed.photos().is_empty() && self.feed.error().is_some() {
            ui::states::error(self.feed.error().unwrap_or_default())
        } else if self.feed.is_loading() {
            ui::states::loading(self.grid.column_count())
        } else if let Some(message) = self.feed.empty_message() {
            ui::states::empty(message)
        } else {
            ui::grid::masonry(
                self.grid.layout(),
                self.grid.config(),
                &self.images,
                self.feed.is_loading_more(),
                self.feed.error(),
            )
        };

        column![ui::search::search_bar(&self.query, self.feed.is_loading()), body].into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let resize = window::resize_events().map(|(_id, size)| Message::WindowResized(size));
        let purge = iced::time::every(self.config.cache_purge_interval).map(|_| Message::PurgeCache);
        let frames = if self.grid.has_pending_frame() {
            window::frames().map(|_| Message::Frame)
        } else {
            Subscription::none()
        };

        Subscription::batch([resize, purge, frames])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

const INITIAL_WINDOW: Size = Size::new(1280.0, 900.0);

/// Fold a page result into the feed and the grid.
///
/// A finished load-more (success or failure) frees the pagination trigger;
/// a stale result belongs to an older search and leaves everything alone.
fn apply_page(
    feed: &mut PhotoFeed,
    grid: &mut MasonryGrid,
    ticket: &FetchTicket,
    result: Result<PhotosPage, ApiError>,
) -> FeedUpdate {
    let update = feed.apply(ticket, result);
    match &update {
        FeedUpdate::Replaced | FeedUpdate::Empty => grid.replace_photos(feed.photos()),
        FeedUpdate::Appended(added) => {
            tracing::debug!("➕ {} photos appended", added);
            grid.update_photos(feed.photos());
        }
        FeedUpdate::Failed if ticket.kind == FetchKind::Search => {
            // The previous query's tiles go away with its results
            grid.replace_photos(feed.photos());
        }
        FeedUpdate::Failed => {}
        FeedUpdate::Stale => return update,
    }
    if ticket.kind == FetchKind::LoadMore {
        grid.settle_pagination();
    }
    update
}

fn fetch_page(client: &Arc<PexelsClient>, ticket: FetchTicket) -> Task<Message> {
    let client = Arc::clone(client);
    Task::perform(
        async move {
            let result = client.search(ticket.params.clone()).await;
            (ticket, result)
        },
        |(ticket, result)| Message::PhotosLoaded(ticket, result),
    )
}

fn fetch_details(client: &Arc<PexelsClient>, ticket: DetailsTicket) -> Task<Message> {
    let client = Arc::clone(client);
    Task::perform(
        async move {
            let result = client.get_by_id(ticket.id).await;
            (ticket, result)
        },
        |(ticket, result)| Message::DetailsLoaded(ticket, result),
    )
}

/// Open the on-disk response store, or fall back to memory when the cache dir is unusable
fn open_store(config: &Config) -> rusqlite::Result<ResponseStore> {
    match ResponseStore::open(config.cache_db.clone()) {
        Ok(store) => Ok(store),
        Err(e) => {
            tracing::warn!("⚠️  Response store unavailable: {}", e);
            ResponseStore::open_in_memory()
        }
    }
}

fn main() -> iced::Result {
    if let Err(e) = logging::setup(cfg!(debug_assertions)) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let config = Config::from_env();
    if !config.has_api_key() {
        tracing::warn!("🔑 No API key set (PEXELS_API_KEY); requests will be rejected");
    }

    // The app cannot function without a client, so bail out early
    let store = match open_store(&config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open response store: {}", e);
            std::process::exit(1);
        }
    };
    if store.path().is_none() {
        tracing::warn!("💾 Responses are cached in memory only");
    }
    let client = match PexelsClient::new(&config, store, Arc::new(SystemClock)) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Failed to build API client: {}", e);
            std::process::exit(1);
        }
    };

    let deep_link = std::env::args().nth(1);

    iced::application("Photo Grid", PhotoGrid::update, PhotoGrid::view)
        .theme(PhotoGrid::theme)
        .subscription(PhotoGrid::subscription)
        .window_size(INITIAL_WINDOW)
        .centered()
        .run_with(move || PhotoGrid::new(config, client, deep_link))
}
