/// Decoded tile images
///
/// Only images near the viewport stay decoded. Anything that scrolls far
/// away (or belongs to a replaced search) is dropped and fetched again from
/// the on-disk store when it comes back.

use iced::widget::image::Handle;
use std::collections::{HashMap, HashSet};

use super::data::Photo;
use crate::layout::VisibleRange;

#[derive(Debug, Default)]
pub struct TileImages {
    handles: HashMap<String, Handle>,
    /// Loaded or on their way
    requested: HashSet<String>,
}

impl TileImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&Handle> {
        self.handles.get(url)
    }

    /// Claim `url` for fetching. `false` if it is already loaded or in flight.
    pub fn request(&mut self, url: &str) -> bool {
        !url.is_empty() && self.requested.insert(url.to_string())
    }

    /// Keep a decoded image, unless it was evicted while in flight
    pub fn loaded(&mut self, url: String, handle: Handle) {
        if self.requested.contains(&url) {
            self.handles.insert(url, handle);
        }
    }

    /// Forget a failed fetch so the next pass can try again
    pub fn failed(&mut self, url: &str) {
        self.requested.remove(url);
    }

    pub fn clear(&mut self) {
        self.handles.clear();
        self.requested.clear();
    }

    /// Drop every image outside the visible range widened by one screenful on
    /// each side. `pinned` (the open details image) is always kept.
    ///
    /// Returns how many URLs were forgotten.
    pub fn retain_near(&mut self, photos: &[Photo], visible: VisibleRange, pinned: Option<&str>) -> usize {
        let mut keep: HashSet<&str> = pinned.into_iter().collect();
        if visible.visible_items > 0 && !photos.is_empty() {
            let margin = visible.visible_items;
            let start = visible.start_index.saturating_sub(margin);
            let end = (visible.end_index + margin).min(photos.len() - 1);
            if let Some(window) = photos.get(start..=end) {
                keep.extend(window.iter().map(Photo::grid_source));
            }
        }

        let before = self.requested.len();
        self.requested.retain(|url| keep.contains(url.as_str()));
        self.handles.retain(|url, _| keep.contains(url.as_str()));
        before - self.requested.len()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }
}
