//! Navigate module
//!
//! Lists folder contents for the browsing views: immediate children only,
//! reserved names hidden, folders first and newest first.

mod operations;
mod results;

// Re-export public types and functions
pub use operations::{RESERVED_NAME, list_folder, sort_entries};
pub use results::{DirEntry, FolderListing};
