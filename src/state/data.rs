/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the photo API, the layout engine and the UI layer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::api::ApiError;

/// Stable identifier of a photo on the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub u64);

impl PhotoId {
    /// Parse an identifier typed by a user or taken from a link.
    ///
    /// Anything that isn't a positive integer is an [`ApiError::InvalidId`].
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(ApiError::InvalidId),
            Ok(id) => Ok(PhotoId(id)),
        }
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The same photo rendered at several sizes by the image CDN
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhotoSources {
    pub original: String,
    pub large2x: String,
    pub large: String,
    pub medium: String,
    pub small: String,
    pub portrait: String,
    pub landscape: String,
    pub tiny: String,
}

/// A single photo as returned by the API. Never mutated after fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    /// Intrinsic width in pixels (only used for the aspect ratio)
    pub width: u32,
    /// Intrinsic height in pixels (only used for the aspect ratio)
    pub height: u32,
    /// Page of the photo on the provider's website
    #[serde(default)]
    pub url: String,
    pub photographer: String,
    #[serde(default)]
    pub photographer_url: String,
    #[serde(default)]
    pub photographer_id: u64,
    #[serde(default)]
    pub avg_color: Option<String>,
    pub src: PhotoSources,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub alt: Option<String>,
}

impl Photo {
    /// Alt text, or a generic label when the provider didn't supply one
    pub fn alt_text(&self) -> &str {
        match self.alt.as_deref() {
            Some(alt) if !alt.trim().is_empty() => alt,
            _ => "Photo",
        }
    }

    /// URL used for grid tiles
    pub fn grid_source(&self) -> &str {
        &self.src.medium
    }

    /// URL used by the details view
    pub fn detail_source(&self) -> &str {
        if self.src.large.is_empty() {
            &self.src.original
        } else {
            &self.src.large
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhotosPage {
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// What to ask the API for. Owned by the feed, not the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
}

impl SearchParams {
    pub fn first_page(query: impl Into<String>, per_page: u32) -> Self {
        Self {
            query: query.into(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn next_page(&self) -> Self {
        Self {
            query: self.query.clone(),
            page: self.page.saturating_add(1),
            per_page: self.per_page,
        }
    }

    /// Query string pairs in the order the API expects
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

/// Ordered photo list without duplicate ids.
///
/// The first occurrence of an id wins; later copies are dropped, not merged.
#[derive(Debug, Clone, Default)]
pub struct PhotoList {
    photos: Vec<Photo>,
    seen: HashSet<PhotoId>,
}

impl PhotoList {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_photos(photos: impl IntoIterator<Item = Photo>) -> Self {
        let mut list = Self::new();
        list.extend(photos);
        list
    }

    /// Append photos, skipping ids already present. Returns how many were added.
    pub fn extend(&mut self, photos: impl IntoIterator<Item = Photo>) -> usize {
        let before = self.photos.len();
        for photo in photos {
            if self.seen.insert(photo.id) {
                self.photos.push(photo);
            }
        }
        self.photos.len() - before
    }

    /// Throw away the current contents (new search)
    pub fn replace(&mut self, photos: impl IntoIterator<Item = Photo>) {
        self.photos.clear();
        self.seen.clear();
        self.extend(photos);
    }

    pub fn contains(&self, id: PhotoId) -> bool {
        self.seen.contains(&id)
    }

    pub fn get(&self, id: PhotoId) -> Option<&Photo> {
        if !self.contains(id) {
            return None;
        }
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn as_slice(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A photo with the given id and intrinsic size
    pub fn photo(id: u64, width: u32, height: u32) -> Photo {
        let base = format!("https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg");
        Photo {
            id: PhotoId(id),
            width,
            height,
            url: format!("https://www.pexels.com/photo/{id}/"),
            photographer: "John Doe".to_string(),
            photographer_url: "https://www.pexels.com/@john".to_string(),
            photographer_id: 1,
            avg_color: Some("#000000".to_string()),
            src: PhotoSources {
                original: base.clone(),
                large2x: format!("{base}?h=650&w=940&dpr=2"),
                large: format!("{base}?h=650&w=940"),
                medium: format!("{base}?h=350"),
                small: format!("{base}?h=130"),
                portrait: format!("{base}?h=1200&w=800"),
                landscape: format!("{base}?h=627&w=1200"),
                tiny: format!("{base}?h=200&w=280"),
            },
            liked: false,
            alt: Some(format!("Test photo {id}")),
        }
    }

    pub fn square(id: u64) -> Photo {
        photo(id, 1000, 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{photo, square};
    use super::*;

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut second = square(2);
        second.photographer = "First".to_string();
        let mut dup = square(2);
        dup.photographer = "Second".to_string();

        let list = PhotoList::from_photos(vec![square(1), second, dup, square(3)]);
        let ids: Vec<u64> = list.as_slice().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(list.get(PhotoId(2)).unwrap().photographer, "First");
    }

    #[test]
    fn test_extend_counts_new_only() {
        let mut list = PhotoList::from_photos(vec![square(1), square(2)]);
        assert_eq!(list.extend(vec![square(2), square(3), square(4)]), 2);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_replace_resets_seen() {
        let mut list = PhotoList::from_photos(vec![square(1), square(2)]);
        list.replace(vec![square(2)]);
        assert_eq!(list.len(), 1);
        assert!(!list.contains(PhotoId(1)));
        assert_eq!(list.extend(vec![square(1)]), 1);
    }

    #[test]
    fn test_photo_id_parse() {
        assert_eq!(PhotoId::parse("12345"), Ok(PhotoId(12345)));
        assert_eq!(PhotoId::parse(" 7 "), Ok(PhotoId(7)));
        assert_eq!(PhotoId::parse("abc"), Err(ApiError::InvalidId));
        assert_eq!(PhotoId::parse(""), Err(ApiError::InvalidId));
        assert_eq!(PhotoId::parse("0"), Err(ApiError::InvalidId));
        assert_eq!(PhotoId::parse("-3"), Err(ApiError::InvalidId));
    }

    #[test]
    fn test_deserialize_api_photo() {
        let json = r##"{
            "id": 2014422,
            "width": 3024,
            "height": 3024,
            "url": "https://www.pexels.com/photo/brown-rocks-during-golden-hour-2014422/",
            "photographer": "Joey Farina",
            "photographer_url": "https://www.pexels.com/@joey",
            "photographer_id": 680589,
            "avg_color": "#978E82",
            "src": {
                "original": "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg",
                "large2x": "a", "large": "b", "medium": "c",
                "small": "d", "portrait": "e", "landscape": "f", "tiny": "g"
            },
            "liked": false,
            "alt": "Brown Rocks During Golden Hour"
        }"##;
        let photo: Photo = serde_json::from_str(json).unwrap();
        assert_eq!(photo.id, PhotoId(2014422));
        assert_eq!(photo.grid_source(), "c");
        assert_eq!(photo.detail_source(), "b");
        assert_eq!(photo.alt_text(), "Brown Rocks During Golden Hour");
    }

    #[test]
    fn test_alt_text_fallback() {
        let mut p = photo(1, 10, 10);
        p.alt = Some("  ".to_string());
        assert_eq!(p.alt_text(), "Photo");
        p.alt = None;
        assert_eq!(p.alt_text(), "Photo");
    }

    #[test]
    fn test_search_params_paging() {
        let params = SearchParams::first_page("nature", 20);
        let next = params.next_page();
        assert_eq!(next.page, 2);
        assert_eq!(next.query, "nature");
        assert_eq!(
            next.to_query_pairs(),
            vec![
                ("query", "nature".to_string()),
                ("page", "2".to_string()),
                ("per_page", "20".to_string()),
            ]
        );
    }
}
