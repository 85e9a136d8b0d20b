/// Masonry layout and virtualization
///
/// This module turns a photo list into something the grid view can draw:
/// - Greedy shortest-column balancing (balancer.rs)
/// - Aspect-ratio based height estimation (height.rs)
/// - Approximate visible-window estimation (viewport.rs)
/// - Near-bottom pagination detection (pagination.rs)
/// - Frame-coalesced recomputation slots (frame.rs)
/// - The orchestrator that ties them together (grid.rs)
///
/// Nothing in here touches iced widgets, so all of it is unit tested directly.

pub mod balancer;
pub mod frame;
pub mod grid;
pub mod height;
pub mod pagination;
pub mod viewport;

pub use grid::{GridConfig, GridLayout, MasonryGrid, PlacedPhoto, VisibleRange};

/// Snapshot of the scrollable grid container, in logical pixels.
///
/// Mirrors what a scrollable element reports: its own width, the visible
/// height, the scroll offset, and the height of the scrolled content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Width of the container
    pub width: f32,
    /// Visible height of the container
    pub client_height: f32,
    /// Vertical scroll offset
    pub scroll_top: f32,
    /// Total height of the scrolled content
    pub scroll_height: f32,
}

impl ScrollMetrics {
    /// Distance in pixels between the bottom of the viewport and the end of the content
    pub fn distance_to_bottom(&self) -> f32 {
        self.scroll_height - self.scroll_top - self.client_height
    }

    /// A container that has never been laid out reports zero width or height
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.client_height > 0.0
    }
}
