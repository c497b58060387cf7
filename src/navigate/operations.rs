//! Folder listing implementation

use log::{error, info};
use std::cmp::Ordering;
use std::io::ErrorKind;
use tokio::fs;

use crate::error::StorageError;
use crate::navigate::results::{DirEntry, FolderListing};
use crate::storage::filesystem::{create_directory, created_at, is_partial_upload};
use crate::storage::validation::{StorageRoot, join_relative};

/// Child name that is never listed, in any letter case
pub const RESERVED_NAME: &str = "images";

/// Lists the immediate children of the folder at `relative`.
///
/// A folder that does not exist yet is created and reported empty. Entries
/// that vanish between the directory read and their stat are skipped, and so
/// are uploads still in flight.
pub async fn list_folder(root: &StorageRoot, relative: &str) -> Result<FolderListing, StorageError> {
    let relative = relative.trim_matches('/');
    let real_path = root.resolve(relative)?;

    let mut read_dir = match fs::read_dir(&real_path).await {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Folder {} does not exist yet, creating it", real_path.display());
            create_directory(&real_path)
                .await
                .map_err(|e| StorageError::from_io(e, relative))?;
            return Ok(FolderListing {
                relative_path: relative.to_string(),
                entries: Vec::new(),
            });
        }
        Err(e) => {
            error!("Failed to list folder {} (real: {}): {}", relative, real_path.display(), e);
            return Err(StorageError::from_io(e, relative));
        }
    };

    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| StorageError::from_io(e, relative))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.eq_ignore_ascii_case(RESERVED_NAME) || is_partial_upload(&name) {
            continue;
        }

        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(StorageError::from_io(e, &join_relative(relative, &name))),
        };

        entries.push(DirEntry {
            relative_path: join_relative(relative, &name),
            is_directory: metadata.is_dir(),
            created_at: created_at(&metadata),
            name,
        });
    }

    sort_entries(&mut entries);

    info!(
        "Listed folder {} (real: {}) - {} entries",
        if relative.is_empty() { "/" } else { relative },
        real_path.display(),
        entries.len()
    );

    Ok(FolderListing {
        relative_path: relative.to_string(),
        entries,
    })
}

/// Folders before files; newest first within each group.
pub fn sort_entries(entries: &mut [DirEntry]) {
    entries.sort_by(|a, b| match (a.is_directory, b.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => b.created_at.cmp(&a.created_at),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn root() -> (TempDir, StorageRoot) {
        let dir = TempDir::new().unwrap();
        let root = StorageRoot::open(dir.path()).unwrap();
        (dir, root)
    }

    fn entry(name: &str, is_directory: bool, secs: u64) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            is_directory,
            created_at: UNIX_EPOCH + Duration::from_secs(secs),
            relative_path: name.to_string(),
        }
    }

    #[test]
    fn sort_puts_folders_first_then_newest() {
        let mut entries = vec![
            entry("old.txt", false, 10),
            entry("old-dir", true, 5),
            entry("new.txt", false, 30),
            entry("new-dir", true, 50),
        ];
        sort_entries(&mut entries);

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["new-dir", "old-dir", "new.txt", "old.txt"]);
    }

    #[tokio::test]
    async fn missing_folder_is_created_and_empty() {
        let (_dir, root) = root();
        let listing = list_folder(&root, "sem1/notes").await.unwrap();

        assert!(listing.is_empty());
        assert_eq!(listing.relative_path, "sem1/notes");
        assert!(root.resolve("sem1/notes").unwrap().is_dir());
    }

    #[tokio::test]
    async fn reserved_name_is_hidden_in_any_case() {
        let (_dir, root) = root();
        for name in ["images", "Images", "IMAGES"] {
            let path = root.resolve(name).unwrap();
            if name == "images" {
                fs::create_dir(&path).await.unwrap();
            } else {
                fs::write(&path, "x").await.unwrap();
            }
        }
        fs::write(root.resolve("kept.txt").unwrap(), "x").await.unwrap();

        let listing = list_folder(&root, "").await.unwrap();
        let names: Vec<&str> = listing.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["kept.txt"]);
    }

    #[tokio::test]
    async fn folders_precede_files() {
        let (_dir, root) = root();
        fs::write(root.resolve("a.txt").unwrap(), "x").await.unwrap();
        fs::create_dir(root.resolve("z-folder").unwrap()).await.unwrap();
        fs::write(root.resolve("b.md").unwrap(), "x").await.unwrap();
        fs::create_dir(root.resolve("a-folder").unwrap()).await.unwrap();

        let listing = list_folder(&root, "").await.unwrap();
        let first_file = listing
            .entries
            .iter()
            .position(|e| !e.is_directory)
            .unwrap();
        assert_eq!(first_file, 2);
        assert!(listing.entries[first_file..].iter().all(|e| !e.is_directory));
    }

    #[tokio::test]
    async fn relative_paths_include_parent() {
        let (_dir, root) = root();
        fs::create_dir_all(root.resolve("sem1/notes").unwrap()).await.unwrap();
        fs::write(root.resolve("sem1/notes/a.txt").unwrap(), "x").await.unwrap();

        let listing = list_folder(&root, "sem1/notes/").await.unwrap();
        assert_eq!(listing.entries.len(), 1);
        assert_eq!(listing.entries[0].relative_path, "sem1/notes/a.txt");
    }

    #[tokio::test]
    async fn traversal_is_rejected_before_listing() {
        let (_dir, root) = root();
        assert!(matches!(
            list_folder(&root, "../..").await,
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn listing_a_file_fails() {
        let (_dir, root) = root();
        fs::write(root.resolve("a.txt").unwrap(), "x").await.unwrap();
        assert!(matches!(
            list_folder(&root, "a.txt").await,
            Err(StorageError::NotADirectory(_))
        ));
        assert!(matches!(
            list_folder(&root, "a.txt/x").await,
            Err(StorageError::NotADirectory(_))
        ));
    }

    #[tokio::test]
    async fn partial_uploads_are_hidden() {
        let (_dir, root) = root();
        fs::write(root.resolve(".partial-abc_a.txt").unwrap(), "x").await.unwrap();
        fs::write(root.resolve("done.tmp").unwrap(), "x").await.unwrap();

        let listing = list_folder(&root, "").await.unwrap();
        let names: Vec<&str> = listing.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["done.tmp"]);
    }
}
