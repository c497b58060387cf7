//! File system storage management
//!
//! Handles path validation and the create, rename and delete operations on
//! documents and folders.

pub mod filesystem;
pub mod operations;
pub mod results;
pub mod validation;

pub use operations::{create_file, create_folder, create_semester, delete_entry, rename_entry};
pub use results::{CreateResult, DeleteResult, RenameResult};
pub use validation::{StorageRoot, sanitize_name};
