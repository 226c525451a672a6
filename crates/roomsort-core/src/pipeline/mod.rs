//! Image input stages.
//!
//! - **discovery**: Find image files in a directory
//! - **encode**: Read an image into a transport payload with a MIME type

pub mod discovery;
pub mod encode;

// Re-exports for convenient access
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use encode::{ImageEncoder, MimePolicy};
