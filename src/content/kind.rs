//! File classification

use crate::storage::validation::extension_of;

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// How a document is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Markdown,
    Pdf,
    Image,
}

impl FileKind {
    /// Whether the view carries the document inline
    pub fn is_inline(self) -> bool {
        matches!(self, FileKind::Text | FileKind::Markdown)
    }

    /// Content type used when serving raw bytes
    pub fn content_type(self, filename: &str) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Markdown => "text/markdown; charset=utf-8",
            FileKind::Text => "text/plain; charset=utf-8",
            FileKind::Image => match lowercase_extension(filename).as_deref() {
                Some("jpg") | Some("jpeg") => "image/jpeg",
                Some("png") => "image/png",
                Some("gif") => "image/gif",
                Some("webp") => "image/webp",
                Some("bmp") => "image/bmp",
                _ => "application/octet-stream",
            },
        }
    }
}

fn lowercase_extension(filename: &str) -> Option<String> {
    extension_of(filename).map(|ext| ext.to_ascii_lowercase())
}

/// Classify a file name by its extension, ignoring case
pub fn classify(filename: &str) -> FileKind {
    match lowercase_extension(filename).as_deref() {
        Some("md") => FileKind::Markdown,
        Some("pdf") => FileKind::Pdf,
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => FileKind::Image,
        _ => FileKind::Text,
    }
}
