//! Raw file serving

use log::info;
use tokio::fs;

use crate::content::classify;
use crate::error::StorageError;
use crate::storage::validation::StorageRoot;
use crate::transfer::results::RawFile;

/// Reads the bytes of the document at `relative`, checking it exists and is
/// not a folder.
pub async fn read_raw(root: &StorageRoot, relative: &str) -> Result<RawFile, StorageError> {
    let relative = relative.trim_matches('/');
    let path = root.resolve(relative)?;

    let meta = fs::metadata(&path)
        .await
        .map_err(|e| StorageError::from_io(e, relative))?;
    if meta.is_dir() {
        return Err(StorageError::IsADirectory(relative.to_string()));
    }

    let bytes = fs::read(&path)
        .await
        .map_err(|e| StorageError::from_io(e, relative))?;
    let filename = relative.rsplit('/').next().unwrap_or(relative).to_string();
    let content_type = classify(&filename).content_type(&filename);

    info!("Serving {} ({} bytes, {})", relative, bytes.len(), content_type);

    Ok(RawFile {
        filename,
        content_type,
        bytes,
    })
}
