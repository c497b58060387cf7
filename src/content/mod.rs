//! Content rendering
//!
//! Classifies documents by extension and prepares their inline payload.

mod kind;
mod markdown;
mod operations;

pub use kind::{FileKind, classify};
pub use markdown::markdown_to_html;
pub use operations::{FileView, read_for_edit, render_file};
