//! Storage result types
//!
//! Defines result structures returned by storage operations.

/// Result of creating a file or folder
#[derive(Debug, Clone)]
pub struct CreateResult {
    /// Relative path of the new entry
    pub relative_path: String,
    /// Relative path of the folder it was created in
    pub parent: String,
}

/// Result of a rename or in-place rewrite
#[derive(Debug, Clone)]
pub struct RenameResult {
    pub relative_path: String,
    pub parent: String,
    pub renamed: bool,
    pub rewritten: bool,
}

/// Result of a deletion
#[derive(Debug, Clone)]
pub struct DeleteResult {
    pub relative_path: String,
    pub was_directory: bool,
}
