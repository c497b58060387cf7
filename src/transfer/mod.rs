//! Transfer module
//!
//! Handles multipart uploads into the storage tree and raw byte downloads
//! for embedded images and PDFs.

pub mod download;
pub mod results;
pub mod upload;

pub use download::read_raw;
pub use results::{RawFile, UploadLimits, UploadResult};
pub use upload::{store_uploads, unique_stored_name};
