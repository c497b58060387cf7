//! Multipart upload handling
//!
//! Each file is streamed to a hidden sibling and renamed into place once
//! complete. Stored names are a fresh UUID plus the sanitized original name,
//! so they never collide and never carry path separators.

use axum::extract::Multipart;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{StorageError, TransferError};
use crate::storage::filesystem::{PARTIAL_PREFIX, create_directory};
use crate::storage::validation::{StorageRoot, join_relative, sanitize_name};
use crate::transfer::results::{UploadLimits, UploadResult};

/// Name a new upload is stored under
pub fn unique_stored_name(original: &str) -> String {
    let sanitized = sanitize_name(original).unwrap_or_else(|| "file".to_string());
    format!("{}_{}", Uuid::new_v4(), sanitized)
}

/// Stores every file part of `multipart` into the folder at `destination`.
///
/// The folder is created when missing, once the first file part arrives. If
/// any file fails, files already stored by this request are removed again.
pub async fn store_uploads(
    root: &StorageRoot,
    destination: &str,
    multipart: Multipart,
    limits: UploadLimits,
) -> Result<UploadResult, TransferError> {
    let destination = destination.trim_matches('/');
    root.resolve(destination)?;

    let mut stored = Vec::new();
    match receive_files(root, destination, multipart, limits, &mut stored).await {
        Ok(files) if files.is_empty() => Err(TransferError::NoFiles),
        Ok(files) => {
            info!(
                "Stored {} upload(s) in {}",
                files.len(),
                if destination.is_empty() { "/" } else { destination }
            );
            Ok(UploadResult {
                folder: destination.to_string(),
                files,
            })
        }
        Err(e) => {
            for path in &stored {
                if let Err(cleanup) = fs::remove_file(path).await {
                    warn!("Failed to discard partial upload {}: {}", path.display(), cleanup);
                }
            }
            Err(e)
        }
    }
}

async fn receive_files(
    root: &StorageRoot,
    destination: &str,
    mut multipart: Multipart,
    limits: UploadLimits,
    stored: &mut Vec<PathBuf>,
) -> Result<Vec<String>, TransferError> {
    let mut names = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| TransferError::Multipart(e.to_string()))?
    {
        let original = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        if names.len() >= limits.max_files {
            return Err(TransferError::TooManyFiles(limits.max_files));
        }

        if names.is_empty() {
            let folder = root.resolve(destination)?;
            create_directory(&folder)
                .await
                .map_err(|e| StorageError::from_io(e, destination))?;
        }

        let stored_name = unique_stored_name(&original);
        let final_path = root.resolve(&join_relative(destination, &stored_name))?;
        let temp_path = temp_path_for(&final_path);

        let mut temp_file = File::create(&temp_path)
            .await
            .map_err(|e| StorageError::from_io(e, &stored_name))?;

        let mut total_bytes = 0u64;
        let written: Result<(), TransferError> = async {
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| TransferError::Multipart(e.to_string()))?
            {
                // Check file size limit BEFORE writing (fail fast)
                total_bytes += chunk.len() as u64;
                if total_bytes > limits.max_file_size {
                    return Err(TransferError::FileTooLarge {
                        name: original.clone(),
                        limit: limits.max_file_size,
                    });
                }
                temp_file
                    .write_all(&chunk)
                    .await
                    .map_err(|e| StorageError::from_io(e, &stored_name))?;
            }
            temp_file
                .flush()
                .await
                .map_err(|e| StorageError::from_io(e, &stored_name))?;
            Ok(())
        }
        .await;
        drop(temp_file);

        if let Err(e) = written {
            error!("Upload of {} aborted: {}", original, e);
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            error!("Failed to move {} into place: {}", temp_path.display(), e);
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::from_io(e, &stored_name).into());
        }

        info!("Stored upload {} as {} ({} bytes)", original, stored_name, total_bytes);
        stored.push(final_path);
        names.push(stored_name);
    }

    Ok(names)
}

fn temp_path_for(final_path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(PARTIAL_PREFIX);
    if let Some(file_name) = final_path.file_name() {
        name.push(file_name);
    }
    final_path.with_file_name(name)
}
