/// Masonry grid orchestrator
///
/// Owns the container measurement and everything derived from it:
/// column count, column assignment, total scroll height and the visible
/// window. Each recomputation walks `Measuring -> Balancing -> Windowing`
/// and ends back in `Idle`.

use super::balancer::balance;
use super::frame::FrameSlot;
use super::height::{column_width, estimate_height, DEFAULT_ITEM_HEIGHT};
use super::pagination::PaginationTrigger;
use super::viewport::{ViewportEstimator, ViewportState};
use super::ScrollMetrics;
use crate::perf::Stopwatch;
use crate::state::data::{Photo, PhotoList};

/// Visible window over the photo list's logical index space
pub type VisibleRange = ViewportState;

/// Layout constants for the grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Horizontal padding of the container, both sides combined
    pub padding: f32,
    /// Space between columns and between tiles
    pub gap: f32,
    /// Containers narrower than this use the narrow minimum column width
    pub narrow_breakpoint: f32,
    pub narrow_min_column_width: f32,
    pub wide_min_column_width: f32,
    /// Width assumed while the container hasn't been measured
    pub fallback_width: f32,
    /// Visible height assumed while the container hasn't been measured
    pub fallback_client_height: f32,
    /// Rows rendered above and below the visible ones
    pub overscan: usize,
    /// Distance from the bottom that triggers loading the next page
    pub near_bottom_threshold: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            padding: 32.0,
            gap: 16.0,
            narrow_breakpoint: 600.0,
            narrow_min_column_width: 300.0,
            wide_min_column_width: 350.0,
            fallback_width: 1200.0,
            fallback_client_height: 800.0,
            overscan: 5,
            near_bottom_threshold: super::pagination::NEAR_BOTTOM_THRESHOLD,
        }
    }
}

impl GridConfig {
    /// Number of columns that fit in a container `width` pixels wide
    pub fn column_count_for_width(&self, width: f32) -> usize {
        if !width.is_finite() || width <= 0.0 {
            return 1;
        }
        let min_column_width = if width < self.narrow_breakpoint {
            self.narrow_min_column_width
        } else {
            self.wide_min_column_width
        };
        ((width / min_column_width).floor() as usize).max(1)
    }
}

/// Where the orchestrator is in its recomputation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Measuring,
    Balancing,
    Windowing,
}

/// A photo placed in a column, with its list index and estimated height
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPhoto {
    pub index: usize,
    pub photo: Photo,
    pub height: f32,
}

/// Everything the rendering layer needs
#[derive(Debug, Clone, Copy)]
pub struct GridLayout<'a> {
    pub columns: &'a [Vec<PlacedPhoto>],
    pub total_height: f32,
    pub visible_range: VisibleRange,
}

impl GridLayout<'_> {
    /// Height of the column row including its vertical `padding`.
    ///
    /// Never shorter than the visible area once there is anything to show,
    /// so short lists still fill the viewport.
    pub fn content_height(&self, padding: f32) -> f32 {
        if self.total_height > 0.0 {
            self.total_height + padding
        } else {
            0.0
        }
    }
}

/// What a frame tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOutcome {
    /// Columns were rebuilt
    pub rebalanced: bool,
    /// The caller should start fetching the next page
    pub load_more: bool,
}

#[derive(Debug)]
pub struct MasonryGrid {
    config: GridConfig,
    photos: Vec<Photo>,
    column_count: usize,
    container: Option<ScrollMetrics>,
    columns: Vec<Vec<PlacedPhoto>>,
    heights: Vec<f32>,
    total_height: f32,
    viewport: ViewportEstimator,
    visible: VisibleRange,
    pagination: PaginationTrigger,
    resize_slot: FrameSlot<ScrollMetrics>,
    scroll_slot: FrameSlot<ScrollMetrics>,
    phase: Phase,
}

impl MasonryGrid {
    pub fn new(config: GridConfig) -> Self {
        let column_count = config.column_count_for_width(config.fallback_width);
        let viewport = ViewportEstimator::new(config.overscan);
        let pagination = PaginationTrigger::new(config.near_bottom_threshold);

        let mut grid = Self {
            config,
            photos: Vec::new(),
            column_count,
            container: None,
            columns: Vec::new(),
            heights: Vec::new(),
            total_height: 0.0,
            viewport,
            visible: VisibleRange::EMPTY,
            pagination,
            resize_slot: FrameSlot::new(),
            scroll_slot: FrameSlot::new(),
            phase: Phase::Idle,
        };
        grid.rebalance();
        grid.rewindow();
        grid
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn container(&self) -> Option<ScrollMetrics> {
        self.container
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.visible
    }

    pub fn layout(&self) -> GridLayout<'_> {
        GridLayout {
            columns: &self.columns,
            total_height: self.total_height,
            visible_range: self.visible,
        }
    }

    /// A brand new list (new search): rebalance and go back to cold start
    pub fn replace_photos(&mut self, photos: &PhotoList) {
        self.viewport.reset();
        self.pagination.settle();
        self.set_photos(photos);
    }

    /// The list grew (next page arrived): rebalance from scratch
    pub fn update_photos(&mut self, photos: &PhotoList) {
        self.set_photos(photos);
    }

    fn set_photos(&mut self, photos: &PhotoList) {
        self.photos = photos.as_slice().to_vec();
        self.rebalance();
        self.rewindow();
    }

    /// Measure the container right away (first layout)
    pub fn measure(&mut self, metrics: ScrollMetrics) -> bool {
        self.phase = Phase::Measuring;

        let previous = self.container.replace(metrics);
        let column_count = self.config.column_count_for_width(metrics.width);
        let width_changed = previous.map_or(true, |p| (p.width - metrics.width).abs() > 0.5);

        let rebalanced = if column_count != self.column_count || width_changed {
            if column_count != self.column_count {
                tracing::debug!("📐 Columns: {} -> {}", self.column_count, column_count);
            }
            self.column_count = column_count;
            self.rebalance();
            true
        } else {
            false
        };

        self.rewindow();
        rebalanced
    }

    /// The window was resized; handled on the next frame
    pub fn request_resize(&mut self, width: f32, client_height: f32) {
        let mut metrics = self.container.unwrap_or_default();
        metrics.width = width;
        metrics.client_height = client_height;
        self.resize_slot.schedule(metrics);
    }

    /// The container scrolled; handled on the next frame
    pub fn request_scroll(&mut self, metrics: ScrollMetrics) {
        self.scroll_slot.schedule(metrics);
    }

    pub fn has_pending_frame(&self) -> bool {
        self.resize_slot.is_pending() || self.scroll_slot.is_pending()
    }

    /// Drop anything scheduled (the view is going away)
    pub fn cancel_pending(&mut self) {
        self.resize_slot.cancel();
        self.scroll_slot.cancel();
    }

    /// Run the recomputation scheduled for this frame
    pub fn on_frame(&mut self, has_more: bool) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();

        if let Some(metrics) = self.resize_slot.take() {
            outcome.rebalanced |= self.measure(metrics);
        }

        if let Some(metrics) = self.scroll_slot.take() {
            outcome.rebalanced |= self.measure(metrics);
            outcome.load_more = self.pagination.check(&metrics, has_more);
            if outcome.load_more {
                tracing::debug!(
                    "📜 Near bottom ({:.0}px left), requesting next page",
                    metrics.distance_to_bottom()
                );
            }
        }

        outcome
    }

    /// The page requested by the trigger arrived or failed
    pub fn settle_pagination(&mut self) {
        self.pagination.settle();
    }

    #[cfg(test)]
    pub fn pagination_in_flight(&self) -> bool {
        self.pagination.in_flight()
    }

    fn rebalance(&mut self) {
        self.phase = Phase::Balancing;
        let watch = Stopwatch::start("masonry-balance");

        let width = self
            .container
            .map(|c| c.width)
            .filter(|w| *w > 0.0)
            .unwrap_or(self.config.fallback_width);
        let col_width = column_width(width, self.config.padding, self.config.gap, self.column_count);
        let gap = self.config.gap;

        let placed = self.photos.iter().enumerate().map(|(index, photo)| PlacedPhoto {
            index,
            photo: photo.clone(),
            height: estimate_height(photo.width, photo.height, col_width),
        });
        let result = balance(placed, self.column_count, |p| p.height + gap);

        self.total_height = if self.photos.is_empty() {
            0.0
        } else {
            let client_height = self
                .container
                .map(|c| c.client_height)
                .filter(|h| *h > 0.0)
                .unwrap_or(self.config.fallback_client_height);
            result.tallest().max(client_height)
        };
        self.columns = result.columns;
        self.heights = result.heights;

        watch.finish();
    }

    fn rewindow(&mut self) {
        self.phase = Phase::Windowing;

        let count = self.photos.len();
        let columns = self.column_count.max(1);
        let rows = count.div_ceil(columns);

        let shortest = self.heights.iter().copied().fold(f32::INFINITY, f32::min);
        let row_height = if rows > 0 && shortest.is_finite() && shortest > 0.0 {
            shortest / rows as f32
        } else {
            DEFAULT_ITEM_HEIGHT
        };

        let metrics = self
            .container
            .filter(ScrollMetrics::is_measured)
            .unwrap_or(ScrollMetrics {
                width: self.config.fallback_width,
                client_height: self.config.fallback_client_height,
                scroll_top: self.container.map_or(0.0, |c| c.scroll_top),
                scroll_height: 0.0,
            });

        let row_state = self
            .viewport
            .estimate(rows, row_height, metrics.scroll_top, Some(metrics.client_height));

        self.visible = if row_state.visible_items == 0 {
            VisibleRange::EMPTY
        } else {
            let start = row_state.start_index * columns;
            let end = ((row_state.end_index + 1) * columns - 1).min(count - 1);
            VisibleRange {
                start_index: start,
                end_index: end,
                visible_items: end - start + 1,
            }
        };

        self.phase = Phase::Idle;
    }
}

impl Default for MasonryGrid {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}
