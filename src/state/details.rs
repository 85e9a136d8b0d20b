/// Photo details view state
///
/// Opening the view validates the id and hands out a ticket. Closing it
/// (or opening another photo) bumps the generation, so a fetch that
/// resolves afterwards is dropped instead of updating a view that's gone.

use super::data::{Photo, PhotoId};
use super::feed::Generation;
use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailsTicket {
    pub generation: Generation,
    pub id: PhotoId,
}

#[derive(Debug, Clone, Default)]
pub struct PhotoDetails {
    photo: Option<Photo>,
    loading: bool,
    error: Option<String>,
    generation: Generation,
}

impl PhotoDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Open the view for a raw id (from a click or a link)
    pub fn open(&mut self, raw_id: Option<&str>) -> Option<DetailsTicket> {
        self.generation = self.generation.next();
        self.photo = None;
        self.error = None;

        let Some(raw_id) = raw_id.filter(|raw| !raw.trim().is_empty()) else {
            self.loading = false;
            self.error = Some("No photo ID provided".to_string());
            return None;
        };

        match PhotoId::parse(raw_id) {
            Ok(id) => Some(self.open_id(id)),
            Err(err) => {
                self.loading = false;
                self.error = Some(err.to_user_message());
                None
            }
        }
    }

    /// Open the view for an id already known to be valid
    pub fn open_id(&mut self, id: PhotoId) -> DetailsTicket {
        self.generation = self.generation.next();
        self.photo = None;
        self.error = None;
        self.loading = true;
        DetailsTicket {
            generation: self.generation,
            id,
        }
    }

    /// Show a photo we already have while the full record loads
    pub fn prefill(&mut self, ticket: &DetailsTicket, photo: Photo) {
        if ticket.generation == self.generation && photo.id == ticket.id {
            self.photo = Some(photo);
        }
    }

    /// Apply a fetch result; returns false if the view moved on
    pub fn apply(&mut self, ticket: &DetailsTicket, result: Result<Photo, ApiError>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        self.loading = false;
        match result {
            Ok(photo) => {
                self.photo = Some(photo);
                self.error = None;
            }
            Err(err) => {
                tracing::error!("❌ Loading photo {} failed: {}", ticket.id, err);
                self.photo = None;
                self.error = Some(err.to_user_message());
            }
        }
        true
    }

    /// The view went away
    pub fn close(&mut self) {
        self.generation = self.generation.next();
        self.photo = None;
        self.loading = false;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::square;

    #[test]
    fn test_open_and_load() {
        let mut details = PhotoDetails::new();
        let ticket = details.open(Some("42")).unwrap();
        assert_eq!(ticket.id, PhotoId(42));
        assert!(details.is_loading());

        assert!(details.apply(&ticket, Ok(square(42))));
        assert!(!details.is_loading());
        assert_eq!(details.photo().map(|p| p.id), Some(PhotoId(42)));
    }

    #[test]
    fn test_invalid_and_missing_ids() {
        let mut details = PhotoDetails::new();
        assert!(details.open(Some("abc")).is_none());
        assert_eq!(details.error(), Some("Invalid photo ID"));
        assert!(!details.is_loading());

        assert!(details.open(None).is_none());
        assert_eq!(details.error(), Some("No photo ID provided"));

        assert!(details.open(Some("")).is_none());
        assert_eq!(details.error(), Some("No photo ID provided"));
    }

    #[test]
    fn test_result_after_close_is_dropped() {
        let mut details = PhotoDetails::new();
        let ticket = details.open(Some("7")).unwrap();
        details.close();

        assert!(!details.apply(&ticket, Ok(square(7))));
        assert!(details.photo().is_none());
    }

    #[test]
    fn test_reopen_drops_previous_fetch() {
        let mut details = PhotoDetails::new();
        let first = details.open_id(PhotoId(1));
        let second = details.open_id(PhotoId(2));

        assert!(!details.apply(&first, Ok(square(1))));
        assert!(details.apply(&second, Err(ApiError::network(404, "Not Found"))));
        assert_eq!(details.error(), Some("Not Found"));
        assert!(details.photo().is_none());
    }

    #[test]
    fn test_prefill() {
        let mut details = PhotoDetails::new();
        let ticket = details.open_id(PhotoId(3));
        details.prefill(&ticket, square(4));
        assert!(details.photo().is_none());
        details.prefill(&ticket, square(3));
        assert!(details.photo().is_some());
        assert!(details.is_loading());
    }
}
