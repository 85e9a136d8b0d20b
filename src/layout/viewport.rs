/// Approximate visible-window estimation
///
/// Given a uniform item height this predicts which items are on screen,
/// plus an overscan buffer on each side. The result only gates lazy image
/// loading, so an estimate is good enough.

/// Inclusive index range that should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportState {
    pub start_index: usize,
    pub end_index: usize,
    /// Number of items in `start_index..=end_index`, or 0 for the empty window
    pub visible_items: usize,
}

impl ViewportState {
    /// The window reported for invalid inputs
    pub const EMPTY: ViewportState = ViewportState {
        start_index: 0,
        end_index: 0,
        visible_items: 0,
    };

    pub fn contains(&self, index: usize) -> bool {
        self.visible_items > 0 && index >= self.start_index && index <= self.end_index
    }
}

/// Stateful estimator; remembers whether the first (cold start) pass happened
#[derive(Debug, Clone)]
pub struct ViewportEstimator {
    buffer: usize,
    initialized: bool,
}

impl ViewportEstimator {
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer,
            initialized: false,
        }
    }

    /// Go back to cold start, e.g. after the list was replaced
    pub fn reset(&mut self) {
        self.initialized = false;
    }

    /// Estimate the visible range.
    ///
    /// `container_height` is `None` while the container hasn't been measured.
    /// The first valid estimate uses the number of items in view as its
    /// buffer so the screen is filled before any scroll event arrives.
    pub fn estimate(
        &mut self,
        item_count: usize,
        item_height: f32,
        scroll_offset: f32,
        container_height: Option<f32>,
    ) -> ViewportState {
        let Some(container_height) = container_height else {
            return ViewportState::EMPTY;
        };
        if item_count == 0
            || !item_height.is_finite()
            || item_height <= 0.0
            || !container_height.is_finite()
            || container_height <= 0.0
        {
            return ViewportState::EMPTY;
        }

        let items_in_view = (container_height / item_height).ceil() as usize;
        let buffer = if self.initialized {
            self.buffer
        } else {
            items_in_view
        };

        let scroll_offset = if scroll_offset.is_finite() {
            scroll_offset.max(0.0)
        } else {
            0.0
        };
        let last = item_count - 1;
        let first_visible = (scroll_offset / item_height).floor() as usize;
        let start_index = first_visible.saturating_sub(buffer).min(last);
        let end_index = start_index
            .saturating_add(items_in_view)
            .saturating_add(buffer.saturating_mul(2))
            .min(last);

        self.initialized = true;

        ViewportState {
            start_index,
            end_index,
            visible_items: end_index - start_index + 1,
        }
    }
}

impl Default for ViewportEstimator {
    fn default() -> Self {
        Self::new(5)
    }
}
