/// Photo API access
///
/// - Typed errors shared by the whole app (error.rs)
/// - The `PhotoSource` seam and its Pexels implementation (client.rs)

pub mod client;
pub mod error;

pub use client::{PexelsClient, PhotoSource};
pub use error::ApiError;
