//! Render operations

use log::info;
use std::path::PathBuf;
use tokio::fs;

use crate::content::kind::{FileKind, classify};
use crate::content::markdown::markdown_to_html;
use crate::error::StorageError;
use crate::storage::validation::StorageRoot;

/// Everything the file view needs to present one document
#[derive(Debug, Clone)]
pub struct FileView {
    pub filename: String,
    pub relative_path: String,
    pub full_path: PathBuf,
    pub kind: FileKind,
    /// Raw text, or HTML for Markdown. `None` for PDFs and images, which
    /// the browser fetches from the raw byte route.
    pub rendered_content: Option<String>,
}

/// Prepares the view of the document at `relative`.
///
/// Fails with `IsADirectory` when the path names a folder, so the caller can
/// redirect to the listing instead.
pub async fn render_file(root: &StorageRoot, relative: &str) -> Result<FileView, StorageError> {
    let relative = relative.trim_matches('/');
    let full_path = root.resolve(relative)?;
    let filename = file_name(relative)?;

    let meta = fs::metadata(&full_path)
        .await
        .map_err(|e| StorageError::from_io(e, relative))?;
    if meta.is_dir() {
        return Err(StorageError::IsADirectory(relative.to_string()));
    }

    let kind = classify(&filename);
    let rendered_content = match kind {
        FileKind::Pdf | FileKind::Image => None,
        FileKind::Markdown => Some(markdown_to_html(&read_text(&full_path, relative).await?)),
        FileKind::Text => Some(read_text(&full_path, relative).await?),
    };

    info!("Rendered {} as {:?}", relative, kind);

    Ok(FileView {
        filename,
        relative_path: relative.to_string(),
        full_path,
        kind,
        rendered_content,
    })
}

/// Reads a document's raw text for the edit form.
pub async fn read_for_edit(root: &StorageRoot, relative: &str) -> Result<String, StorageError> {
    let relative = relative.trim_matches('/');
    let full_path = root.resolve(relative)?;
    let meta = fs::metadata(&full_path)
        .await
        .map_err(|e| StorageError::from_io(e, relative))?;
    if meta.is_dir() {
        return Err(StorageError::IsADirectory(relative.to_string()));
    }
    read_text(&full_path, relative).await
}

fn file_name(relative: &str) -> Result<String, StorageError> {
    match relative.rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(StorageError::IsADirectory(relative.to_string())),
    }
}

async fn read_text(path: &std::path::Path, relative: &str) -> Result<String, StorageError> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| StorageError::from_io(e, relative))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
