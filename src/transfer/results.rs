//! Transfer result types

/// Per-request upload limits
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_size: u64,
}

impl UploadLimits {
    /// Request body limit that fits every allowed file plus multipart framing
    pub fn body_limit(&self) -> usize {
        let files = (self.max_files as u64).saturating_mul(self.max_file_size);
        usize::try_from(files.saturating_add(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: 5,
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

/// Result of an upload request
#[derive(Debug, Clone)]
pub struct UploadResult {
    /// Folder the files landed in, relative to the storage root
    pub folder: String,
    /// Generated names the files were stored under
    pub files: Vec<String>,
}

/// A document's bytes ready to be served
#[derive(Debug, Clone)]
pub struct RawFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_covers_every_file() {
        let limits = UploadLimits::default();
        assert_eq!(limits.body_limit(), 51 * 1024 * 1024);
    }

    #[test]
    fn body_limit_saturates() {
        let limits = UploadLimits {
            max_files: usize::MAX,
            max_file_size: u64::MAX,
        };
        assert_eq!(limits.body_limit(), usize::MAX);
    }
}
