/// Infinite-scroll trigger
///
/// Fires a "load more" request when the scroll position gets close to the
/// end of the content. The in-flight flag is the only thing that stops it
/// from firing again on the next scroll event; there is no cooldown timer.

use super::ScrollMetrics;

/// How close to the bottom (in pixels) the viewport must be to request more
pub const NEAR_BOTTOM_THRESHOLD: f32 = 200.0;

#[derive(Debug, Clone)]
pub struct PaginationTrigger {
    threshold: f32,
    in_flight: bool,
}

impl PaginationTrigger {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            in_flight: false,
        }
    }

    pub fn is_near_bottom(&self, metrics: &ScrollMetrics) -> bool {
        metrics.distance_to_bottom() < self.threshold
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Check a scroll position and claim the in-flight slot if it should fire.
    ///
    /// Returns `true` exactly once per crossing; the caller is expected to
    /// start the fetch and call [`PaginationTrigger::settle`] when it finishes.
    pub fn check(&mut self, metrics: &ScrollMetrics, has_more: bool) -> bool {
        if self.in_flight || !has_more || !self.is_near_bottom(metrics) {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// The outstanding page arrived (or failed and the UI reset); allow the next crossing
    pub fn settle(&mut self) {
        self.in_flight = false;
    }
}

impl Default for PaginationTrigger {
    fn default() -> Self {
        Self::new(NEAR_BOTTOM_THRESHOLD)
    }
}
