//! JSON response bodies for the AJAX routes

use serde::Serialize;

/// Outcome of a delete or upload
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            files: None,
        }
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = Some(files);
        self
    }
}

/// Successful `POST /sessionLogin`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
}

/// Rejected `POST /sessionLogin`
#[derive(Debug, Serialize)]
pub struct LoginError {
    pub error: &'static str,
    pub code: &'static str,
}
