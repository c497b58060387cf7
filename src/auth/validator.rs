//! Authentication validator
//!
//! Checks an identity token of the form `username:password` against the
//! credential store.

use super::credentials::CredentialStore;
use crate::error::AuthError;

const MAX_INPUT_LENGTH: usize = 128;

/// Performs basic input sanitation to check for malicious or malformed usernames/passwords.
fn is_valid_input(input: &str) -> bool {
    !input.trim().is_empty() && input.len() <= MAX_INPUT_LENGTH && !input.contains(['\r', '\n', '\0'])
}

/// Validates an identity token and returns the username it proves.
pub fn validate_id_token(id_token: &str, store: &CredentialStore) -> Result<String, AuthError> {
    let (username, password) = id_token
        .split_once(':')
        .ok_or_else(|| AuthError::MalformedInput("idToken must be username:password".into()))?;

    if !is_valid_input(username) {
        return Err(AuthError::MalformedInput("Invalid username format".into()));
    }

    if !is_valid_input(password) {
        return Err(AuthError::MalformedInput("Invalid password format".into()));
    }

    // Stored usernames are lowercase
    let username = username.trim().to_lowercase();
    match store.password_for(&username) {
        Some(stored) if stored == password => Ok(username),
        _ => Err(AuthError::InvalidCredentials(username)),
    }
}
