//! Result types for navigate operations

use std::time::SystemTime;

/// One child of a listed folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_directory: bool,
    pub created_at: SystemTime,
    /// Parent's relative path joined with `name` using `/`
    pub relative_path: String,
}

/// Ordered children of one folder
#[derive(Debug, Clone, Default)]
pub struct FolderListing {
    /// Relative path of the listed folder; empty for the root
    pub relative_path: String,
    pub entries: Vec<DirEntry>,
}

impl FolderListing {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
