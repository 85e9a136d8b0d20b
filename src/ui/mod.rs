/// UI building blocks
///
/// Pure view functions; all state lives in the application struct:
/// - Search bar (search.rs)
/// - Masonry grid inside a scrollable (grid.rs)
/// - Photo details page (details.rs)
/// - Loading, error and empty placeholders (states.rs)

pub mod details;
pub mod grid;
pub mod search;
pub mod states;

/// Height reserved for the search bar above the grid
pub const SEARCH_BAR_HEIGHT: f32 = 76.0;
