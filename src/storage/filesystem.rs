//! File system operations
//!
//! Thin async wrappers over `tokio::fs` shared by the lister, renderer and
//! mutation handlers.

use std::fs::Metadata;
use std::io::Result;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

/// Prefix of uploads still being written
pub const PARTIAL_PREFIX: &str = ".partial-";

/// Whether `name` is an upload that has not been moved into place yet
pub fn is_partial_upload(name: &str) -> bool {
    name.starts_with(PARTIAL_PREFIX)
}

/// Create a directory and any missing parents
pub async fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await
}

/// Check if anything exists at `path`
pub async fn entry_exists(path: &Path) -> Result<bool> {
    fs::try_exists(path).await
}

/// Check if file exists
pub async fn file_exists(path: &Path) -> bool {
    matches!(fs::metadata(path).await, Ok(meta) if meta.is_file())
}

/// Creation time, falling back to modification time where the filesystem
/// does not record birth time.
pub fn created_at(meta: &Metadata) -> SystemTime {
    meta.created()
        .or_else(|_| meta.modified())
        .unwrap_or(UNIX_EPOCH)
}
