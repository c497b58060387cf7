//! Error types
//!
//! Defines domain-specific error types for each module of the docs server.

use std::io;
use thiserror::Error;

/// Storage, navigation and rendering errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Resource busy: {0}")]
    Busy(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Is a directory: {0}")]
    IsADirectory(String),

    #[error("Missing input: {0}")]
    EmptyInput(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Classify an I/O failure on `path` into the storage taxonomy.
    pub fn from_io(error: io::Error, path: &str) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
            io::ErrorKind::AlreadyExists => StorageError::Conflict(path.to_string()),
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(path.to_string()),
            io::ErrorKind::ResourceBusy => StorageError::Busy(path.to_string()),
            io::ErrorKind::NotADirectory => StorageError::NotADirectory(path.to_string()),
            io::ErrorKind::IsADirectory => StorageError::IsADirectory(path.to_string()),
            _ => StorageError::Io(error),
        }
    }
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No session cookie presented")]
    MissingSession,

    #[error("Session is not recognised")]
    InvalidSession,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid credentials for user: {0}")]
    InvalidCredentials(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Too many login attempts")]
    RateLimited,
}

impl AuthError {
    /// Short machine-readable code returned to login clients
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingSession => "auth/missing-session",
            AuthError::InvalidSession => "auth/invalid-session",
            AuthError::SessionExpired => "auth/session-expired",
            AuthError::InvalidCredentials(_) => "auth/invalid-credential",
            AuthError::MalformedInput(_) => "auth/argument-error",
            AuthError::RateLimited => "auth/too-many-requests",
        }
    }
}

/// Upload errors
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("No files were uploaded")]
    NoFiles,

    #[error("Too many files: at most {0} per request")]
    TooManyFiles(usize),

    #[error("File {name} exceeds the {limit} byte limit")]
    FileTooLarge { name: String, limit: u64 },

    #[error("Malformed upload: {0}")]
    Multipart(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Top-level error that encompasses all error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("Upload error: {0}")]
    Transfer(#[from] TransferError),
}
