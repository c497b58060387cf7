//! Path validation
//!
//! Resolves untrusted relative paths beneath the storage root and rejects
//! anything that would escape it. Name sanitization happens separately, at
//! input-acceptance time.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Directory beneath which all managed content lives.
///
/// Always absolute and normalized; cloned into every component that touches
/// the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot {
    root: PathBuf,
}

impl StorageRoot {
    /// Create the directory if needed and pin its canonical location.
    pub fn open(path: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(path)?;
        Ok(Self {
            root: path.canonicalize()?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` beneath the root.
    ///
    /// An empty path denotes the root itself. `.` and `..` segments are
    /// collapsed lexically; the result must still lie under the root or the
    /// call fails with `InvalidPath`. No filesystem access happens here.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        if relative.contains('\0') {
            return Err(StorageError::InvalidPath(relative.to_string()));
        }

        let joined = self.root.join(relative.trim_start_matches("./"));
        let normalized = normalize(&joined);

        if normalized.starts_with(&self.root) {
            Ok(normalized)
        } else {
            Err(StorageError::InvalidPath(relative.to_string()))
        }
    }
}

/// Collapse `.` and `..` without touching the filesystem.
///
/// `..` at the filesystem root stays at the root, so the prefix test in
/// `resolve` is what rejects escapes.
fn normalize(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            Component::CurDir => {}
            other => components.push(other),
        }
    }
    components.iter().collect()
}

/// Join a parent relative path and a child name using `/`.
pub fn join_relative(parent: &str, name: &str) -> String {
    let parent = parent.trim_matches('/');
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Parent of a relative path, or empty for top-level entries.
pub fn parent_relative(relative: &str) -> &str {
    match relative.trim_matches('/').rsplit_once('/') {
        Some((parent, _)) => parent,
        None => "",
    }
}

/// Strip every character outside `[A-Za-z0-9._-]`.
///
/// Returns `None` when nothing usable is left, including names made only of
/// dots, which would otherwise alias `.` or `..`.
pub fn sanitize_name(name: &str) -> Option<String> {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        None
    } else {
        Some(cleaned)
    }
}

/// Turn a free-form title into a file name. Whitespace becomes `_`.
pub fn sanitize_title(title: &str) -> Option<String> {
    let spaced: String = title
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    sanitize_name(&spaced)
}

/// Extension of a name, without the dot, if it has a non-empty one.
pub fn extension_of(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}
