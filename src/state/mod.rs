/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - Search results, pagination and error flags (feed.rs)
/// - The photo details view (details.rs)
/// - Decoded tile images kept around the viewport (images.rs)

pub mod data;
pub mod details;
pub mod feed;
pub mod images;
