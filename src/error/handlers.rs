//! Error handlers
//!
//! Converts errors into status-coded HTTP responses. Details are logged on
//! the server; clients only see the message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde_json::json;

use crate::error::types::{AppError, AuthError, StorageError, TransferError};

/// Convert error to HTTP status code
pub fn error_to_status(err: &AppError) -> StatusCode {
    match err {
        AppError::Auth(AuthError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
        AppError::Auth(AuthError::MalformedInput(_)) => StatusCode::BAD_REQUEST,
        AppError::Auth(_) => StatusCode::UNAUTHORIZED,
        AppError::Storage(e) => storage_status(e),
        AppError::Transfer(TransferError::Storage(e)) => storage_status(e),
        AppError::Transfer(TransferError::FileTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        AppError::Transfer(_) => StatusCode::BAD_REQUEST,
    }
}

fn storage_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::InvalidPath(_) => StatusCode::BAD_REQUEST,
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::Conflict(_) | StorageError::Busy(_) => StatusCode::CONFLICT,
        StorageError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        StorageError::NotADirectory(_)
        | StorageError::IsADirectory(_)
        | StorageError::EmptyInput(_) => StatusCode::BAD_REQUEST,
        StorageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log an error at a level matching its severity
pub fn handle_error(err: &AppError, status: StatusCode) {
    if status.is_server_error() {
        error!("Request failed ({}): {:?}", status, err);
    } else {
        warn!("Request rejected ({}): {}", status, err);
    }
}

/// Message shown to clients; internal failures are not echoed back
fn public_message(err: &AppError, status: StatusCode) -> String {
    if status.is_server_error() {
        "Internal server error".to_string()
    } else {
        err.to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status(&self);
        handle_error(&self, status);
        (status, public_message(&self, status)).into_response()
    }
}

/// JSON flavoured error for the AJAX routes
#[derive(Debug)]
pub struct JsonError(pub AppError);

impl From<AppError> for JsonError {
    fn from(error: AppError) -> Self {
        JsonError(error)
    }
}

impl From<StorageError> for JsonError {
    fn from(error: StorageError) -> Self {
        JsonError(error.into())
    }
}

impl From<TransferError> for JsonError {
    fn from(error: TransferError) -> Self {
        JsonError(error.into())
    }
}

impl From<AuthError> for JsonError {
    fn from(error: AuthError) -> Self {
        JsonError(error.into())
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = error_to_status(&self.0);
        handle_error(&self.0, status);
        let body = json!({
            "success": false,
            "message": public_message(&self.0, status),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_documented_codes() {
        let cases = [
            (StorageError::InvalidPath("..".into()), StatusCode::BAD_REQUEST),
            (StorageError::NotFound("a".into()), StatusCode::NOT_FOUND),
            (StorageError::Conflict("a".into()), StatusCode::CONFLICT),
            (StorageError::PermissionDenied("a".into()), StatusCode::FORBIDDEN),
            (StorageError::Busy("a".into()), StatusCode::CONFLICT),
        ];
        for (err, expected) in cases {
            assert_eq!(error_to_status(&AppError::Storage(err)), expected);
        }
    }

    #[test]
    fn upload_limits_map_to_payload_too_large() {
        let err = AppError::Transfer(TransferError::FileTooLarge {
            name: "big.bin".into(),
            limit: 10,
        });
        assert_eq!(error_to_status(&err), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        let err = AppError::Auth(AuthError::InvalidSession);
        assert_eq!(error_to_status(&err), StatusCode::UNAUTHORIZED);
        let err = AppError::Auth(AuthError::RateLimited);
        assert_eq!(error_to_status(&err), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::Storage(StorageError::Io(std::io::Error::other("secret path")));
        let status = error_to_status(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(public_message(&err, status), "Internal server error");
    }
}
