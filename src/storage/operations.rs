//! Storage operations
//!
//! Create, rename and delete for documents and folders. Every path argument
//! is resolved through the storage root before the filesystem is touched.

use log::{error, info, warn};
use std::io::ErrorKind;
use std::time::Duration;
use tokio::fs;

use crate::error::StorageError;
use crate::storage::filesystem::{create_directory, entry_exists};
use crate::storage::results::{CreateResult, DeleteResult, RenameResult};
use crate::storage::validation::{
    StorageRoot, extension_of, join_relative, parent_relative, sanitize_name, sanitize_title,
};

const MAX_RETRIES: u64 = 3;

/// Creates (or overwrites) a text document in `folder`.
///
/// The title is sanitized into a file name; `.txt` is appended when it
/// carries no extension. Missing folders are created.
pub async fn create_file(
    root: &StorageRoot,
    folder: &str,
    title: &str,
    body: &str,
) -> Result<CreateResult, StorageError> {
    if title.trim().is_empty() || body.is_empty() {
        return Err(StorageError::EmptyInput(
            "Title and details are required".into(),
        ));
    }

    let mut filename = sanitize_title(title)
        .ok_or_else(|| StorageError::InvalidPath(title.to_string()))?;
    if extension_of(&filename).is_none() {
        filename.push_str(".txt");
    }

    let folder_path = root.resolve(folder)?;
    let relative_path = join_relative(folder, &filename);
    let file_path = root.resolve(&relative_path)?;

    create_directory(&folder_path)
        .await
        .map_err(|e| StorageError::from_io(e, folder))?;

    if let Err(e) = fs::write(&file_path, body).await {
        error!("Failed to create file {} (real: {}): {}", relative_path, file_path.display(), e);
        return Err(StorageError::from_io(e, &relative_path));
    }

    info!("Created file {} ({} bytes)", relative_path, body.len());

    Ok(CreateResult {
        relative_path,
        parent: folder.trim_matches('/').to_string(),
    })
}

/// Creates a folder named `name` inside `parent`.
///
/// Fails with `Conflict` when any entry of that name already exists.
pub async fn create_folder(
    root: &StorageRoot,
    parent: &str,
    name: &str,
) -> Result<CreateResult, StorageError> {
    if name.trim().is_empty() {
        return Err(StorageError::EmptyInput("Folder name is required".into()));
    }
    let name = sanitize_name(name).ok_or_else(|| StorageError::InvalidPath(name.to_string()))?;

    root.resolve(parent)?;
    let relative_path = join_relative(parent, &name);
    let folder_path = root.resolve(&relative_path)?;

    if entry_exists(&folder_path)
        .await
        .map_err(|e| StorageError::from_io(e, &relative_path))?
    {
        return Err(StorageError::Conflict(relative_path));
    }

    create_directory(&folder_path)
        .await
        .map_err(|e| StorageError::from_io(e, &relative_path))?;

    info!("Created folder {} (real: {})", relative_path, folder_path.display());

    Ok(CreateResult {
        relative_path,
        parent: parent.trim_matches('/').to_string(),
    })
}

/// Creates a top-level folder.
pub async fn create_semester(root: &StorageRoot, name: &str) -> Result<CreateResult, StorageError> {
    create_folder(root, "", name).await
}

/// Renames `previous` (relative to `folder`) to `new_name`, then optionally
/// rewrites the file content with `details`.
///
/// The original extension is kept when `new_name` omits one. An existing
/// destination is never overwritten.
pub async fn rename_entry(
    root: &StorageRoot,
    folder: &str,
    previous: &str,
    new_name: &str,
    details: Option<&str>,
) -> Result<RenameResult, StorageError> {
    if previous.trim().is_empty() || new_name.trim().is_empty() {
        return Err(StorageError::EmptyInput(
            "Current and new names are required".into(),
        ));
    }

    let source_rel = join_relative(folder, previous.trim_matches('/'));
    if source_rel.is_empty() {
        return Err(StorageError::InvalidPath(previous.to_string()));
    }
    let source_path = root.resolve(&source_rel)?;

    let source_meta = fs::metadata(&source_path)
        .await
        .map_err(|e| StorageError::from_io(e, &source_rel))?;
    if source_meta.is_dir() && details.is_some() {
        return Err(StorageError::IsADirectory(source_rel));
    }

    let mut target_name =
        sanitize_name(new_name).ok_or_else(|| StorageError::InvalidPath(new_name.to_string()))?;
    if source_meta.is_file() && extension_of(&target_name).is_none() {
        if let Some(ext) = extension_of(previous) {
            target_name = format!("{}.{}", target_name, ext);
        }
    }

    let parent = parent_relative(&source_rel).to_string();
    let target_rel = join_relative(&parent, &target_name);
    let target_path = root.resolve(&target_rel)?;

    let renamed = target_path != source_path;
    if renamed {
        if entry_exists(&target_path)
            .await
            .map_err(|e| StorageError::from_io(e, &target_rel))?
        {
            return Err(StorageError::Conflict(target_rel));
        }

        if let Err(e) = fs::rename(&source_path, &target_path).await {
            error!("Failed to rename {} to {}: {}", source_rel, target_rel, e);
            let kind = e.kind();
            return Err(match kind {
                ErrorKind::NotFound => StorageError::NotFound(source_rel),
                _ => StorageError::from_io(e, &target_rel),
            });
        }

        info!("Renamed {} to {}", source_rel, target_rel);
    }

    let mut rewritten = false;
    if let Some(content) = details {
        fs::write(&target_path, content)
            .await
            .map_err(|e| StorageError::from_io(e, &target_rel))?;
        rewritten = true;
        info!("Rewrote {} ({} bytes)", target_rel, content.len());
    }

    Ok(RenameResult {
        relative_path: target_rel,
        parent,
        renamed,
        rewritten,
    })
}

/// Deletes a file, or a folder together with everything beneath it.
pub async fn delete_entry(root: &StorageRoot, relative: &str) -> Result<DeleteResult, StorageError> {
    let relative = relative.trim_matches('/');
    if relative.is_empty() {
        return Err(StorageError::InvalidPath("cannot delete the storage root".into()));
    }

    let target = root.resolve(relative)?;
    if target == root.path() {
        return Err(StorageError::InvalidPath(relative.to_string()));
    }

    let meta = fs::metadata(&target)
        .await
        .map_err(|e| StorageError::from_io(e, relative))?;
    let was_directory = meta.is_dir();

    // Delete with retries for permission issues
    for attempt in 1..=MAX_RETRIES {
        let outcome = if was_directory {
            fs::remove_dir_all(&target).await
        } else {
            fs::remove_file(&target).await
        };

        match outcome {
            Ok(()) => {
                info!(
                    "Deleted {} {} (real: {})",
                    if was_directory { "folder" } else { "file" },
                    relative,
                    target.display()
                );
                return Ok(DeleteResult {
                    relative_path: relative.to_string(),
                    was_directory,
                });
            }
            Err(e) if attempt < MAX_RETRIES && e.kind() == ErrorKind::PermissionDenied => {
                warn!("Delete of {} denied (attempt {}), retrying", relative, attempt);
                tokio::time::sleep(Duration::from_millis(100 * attempt)).await;
            }
            Err(e) => {
                error!("Failed to delete {} (real: {}): {}", relative, target.display(), e);
                return Err(StorageError::from_io(e, relative));
            }
        }
    }

    Err(StorageError::PermissionDenied(relative.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root() -> (TempDir, StorageRoot) {
        let dir = TempDir::new().unwrap();
        let root = StorageRoot::open(dir.path()).unwrap();
        (dir, root)
    }

    #[tokio::test]
    async fn create_file_appends_txt_and_writes_body() {
        let (_dir, root) = root();
        let created = create_file(&root, "sem1", "Week 1 notes", "hello").await.unwrap();

        assert_eq!(created.relative_path, "sem1/Week_1_notes.txt");
        assert_eq!(created.parent, "sem1");
        let body = fs::read_to_string(root.resolve("sem1/Week_1_notes.txt").unwrap())
            .await
            .unwrap();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn create_file_keeps_given_extension_and_overwrites() {
        let (_dir, root) = root();
        create_file(&root, "", "readme.md", "# one").await.unwrap();
        let created = create_file(&root, "", "readme.md", "# two").await.unwrap();

        assert_eq!(created.relative_path, "readme.md");
        let body = fs::read_to_string(root.resolve("readme.md").unwrap()).await.unwrap();
        assert_eq!(body, "# two");
    }

    #[tokio::test]
    async fn create_file_requires_title_and_body() {
        let (_dir, root) = root();
        assert!(matches!(
            create_file(&root, "", "", "body").await,
            Err(StorageError::EmptyInput(_))
        ));
        assert!(matches!(
            create_file(&root, "", "title", "").await,
            Err(StorageError::EmptyInput(_))
        ));
    }

    #[tokio::test]
    async fn create_file_rejects_traversing_folder() {
        let (_dir, root) = root();
        assert!(matches!(
            create_file(&root, "../outside", "x", "y").await,
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn create_folder_twice_conflicts() {
        let (_dir, root) = root();
        create_folder(&root, "sem1", "notes").await.unwrap();
        assert!(matches!(
            create_folder(&root, "sem1", "notes").await,
            Err(StorageError::Conflict(p)) if p == "sem1/notes"
        ));
    }

    #[tokio::test]
    async fn create_semester_sanitizes_name() {
        let (_dir, root) = root();
        let created = create_semester(&root, "Fall 2024!").await.unwrap();
        assert_eq!(created.relative_path, "Fall2024");
        assert!(root.resolve("Fall2024").unwrap().is_dir());
    }

    #[tokio::test]
    async fn create_folder_rejects_dot_names() {
        let (_dir, root) = root();
        assert!(matches!(
            create_folder(&root, "", "..").await,
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn rename_preserves_extension() {
        let (_dir, root) = root();
        fs::write(root.resolve("report.txt").unwrap(), "draft").await.unwrap();

        let renamed = rename_entry(&root, "", "report.txt", "final", None).await.unwrap();

        assert_eq!(renamed.relative_path, "final.txt");
        assert!(renamed.renamed);
        assert!(root.resolve("final.txt").unwrap().exists());
        assert!(!root.resolve("report.txt").unwrap().exists());
    }

    #[tokio::test]
    async fn rename_refuses_to_overwrite() {
        let (_dir, root) = root();
        fs::write(root.resolve("a.txt").unwrap(), "a").await.unwrap();
        fs::write(root.resolve("b.txt").unwrap(), "b").await.unwrap();

        assert!(matches!(
            rename_entry(&root, "", "a.txt", "b", None).await,
            Err(StorageError::Conflict(_))
        ));
        let body = fs::read_to_string(root.resolve("b.txt").unwrap()).await.unwrap();
        assert_eq!(body, "b");
    }

    #[tokio::test]
    async fn rename_missing_source_is_not_found() {
        let (_dir, root) = root();
        assert!(matches!(
            rename_entry(&root, "", "ghost.txt", "other", None).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rename_within_nested_folder_stays_there() {
        let (_dir, root) = root();
        create_folder(&root, "", "sem1").await.unwrap();
        fs::write(root.resolve("sem1/a.md").unwrap(), "x").await.unwrap();

        let renamed = rename_entry(&root, "sem1", "a.md", "b", None).await.unwrap();
        assert_eq!(renamed.relative_path, "sem1/b.md");
        assert_eq!(renamed.parent, "sem1");
    }

    #[tokio::test]
    async fn same_name_with_details_rewrites_in_place() {
        let (_dir, root) = root();
        fs::write(root.resolve("a.txt").unwrap(), "old").await.unwrap();

        let result = rename_entry(&root, "", "a.txt", "a.txt", Some("new")).await.unwrap();
        assert!(!result.renamed);
        assert!(result.rewritten);
        let body = fs::read_to_string(root.resolve("a.txt").unwrap()).await.unwrap();
        assert_eq!(body, "new");
    }

    #[tokio::test]
    async fn folder_with_details_is_left_untouched() {
        let (_dir, root) = root();
        create_folder(&root, "", "sem1").await.unwrap();

        assert!(matches!(
            rename_entry(&root, "", "sem1", "sem2", Some("x")).await,
            Err(StorageError::IsADirectory(p)) if p == "sem1"
        ));
        assert!(root.resolve("sem1").unwrap().is_dir());
        assert!(!root.resolve("sem2").unwrap().exists());
    }

    #[tokio::test]
    async fn blank_names_are_missing_input() {
        let (_dir, root) = root();
        fs::write(root.resolve("a.txt").unwrap(), "a").await.unwrap();

        assert!(matches!(
            create_folder(&root, "", "  ").await,
            Err(StorageError::EmptyInput(_))
        ));
        assert!(matches!(create_semester(&root, "").await, Err(StorageError::EmptyInput(_))));
        assert!(matches!(
            rename_entry(&root, "", "a.txt", "", None).await,
            Err(StorageError::EmptyInput(_))
        ));
        assert!(matches!(
            rename_entry(&root, "", "", "b", None).await,
            Err(StorageError::EmptyInput(_))
        ));
    }

    #[tokio::test]
    async fn rename_target_cannot_escape() {
        let (_dir, root) = root();
        fs::write(root.resolve("a.txt").unwrap(), "a").await.unwrap();
        let renamed = rename_entry(&root, "", "a.txt", "../../b.txt", None).await.unwrap();
        assert_eq!(renamed.relative_path, "....b.txt");
    }

    #[tokio::test]
    async fn delete_directory_is_recursive() {
        let (_dir, root) = root();
        create_folder(&root, "", "sem1").await.unwrap();
        create_file(&root, "sem1/notes", "a", "body").await.unwrap();

        let deleted = delete_entry(&root, "sem1").await.unwrap();
        assert!(deleted.was_directory);
        assert!(!root.resolve("sem1").unwrap().exists());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let (_dir, root) = root();
        assert!(matches!(
            delete_entry(&root, "nope.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_refuses_root_and_traversal() {
        let (_dir, root) = root();
        assert!(matches!(delete_entry(&root, "").await, Err(StorageError::InvalidPath(_))));
        assert!(matches!(delete_entry(&root, "a/..").await, Err(StorageError::InvalidPath(_))));
        assert!(matches!(
            delete_entry(&root, "../x").await,
            Err(StorageError::InvalidPath(_))
        ));
    }
}
