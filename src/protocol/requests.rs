//! Request bodies accepted by the routes

use serde::Deserialize;

/// `POST /sessionLogin`
#[derive(Debug, Deserialize)]
pub struct SessionLoginRequest {
    #[serde(rename = "idToken")]
    pub id_token: String,
}

/// `POST /create`
#[derive(Debug, Deserialize)]
pub struct CreateFileForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default, rename = "currentFolder")]
    pub current_folder: Option<String>,
}

impl CreateFileForm {
    /// Target folder: the current folder, else the semester, else the root
    pub fn folder(&self) -> &str {
        [&self.current_folder, &self.semester]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

/// `POST /create-folder`
#[derive(Debug, Deserialize)]
pub struct CreateFolderForm {
    #[serde(default, rename = "folderName")]
    pub folder_name: String,
    #[serde(default, rename = "currentFolder")]
    pub current_folder: String,
}

/// `POST /create-semester`
#[derive(Debug, Deserialize)]
pub struct CreateSemesterForm {
    #[serde(default, rename = "semesterName")]
    pub semester_name: String,
}

/// `POST /edit`
#[derive(Debug, Deserialize)]
pub struct EditForm {
    /// Current name (or path) of the entry
    #[serde(default)]
    pub previous: String,
    /// Folder `previous` lives in
    #[serde(default, rename = "previousPath")]
    pub previous_path: String,
    /// New name
    #[serde(default)]
    pub new: String,
    /// Replacement content, when the edit form submitted it
    #[serde(default)]
    pub details: Option<String>,
}
