//! Session gate
//!
//! `AuthGate` is the seam to the identity provider. `LocalAuthGate` backs it
//! with the configured credential store and an in-memory session table.

use async_trait::async_trait;
use log::{info, warn};
use std::collections::HashMap;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::credentials::CredentialStore;
use super::session::UserClaims;
use super::validator::validate_id_token;
use crate::error::AuthError;

#[async_trait]
pub trait AuthGate: Send + Sync {
    /// Exchange a verified identity token for an opaque session token
    async fn create_session(&self, id_token: &str, ttl: Duration) -> Result<String, AuthError>;

    /// Decode a session token presented in the cookie
    async fn verify_session(&self, token: &str) -> Result<UserClaims, AuthError>;

    /// Forget a session so its cookie stops working
    async fn revoke_session(&self, token: &str);
}

pub struct LocalAuthGate {
    credentials: CredentialStore,
    sessions: Mutex<HashMap<String, UserClaims>>,
}

impl LocalAuthGate {
    pub fn new(credentials: CredentialStore) -> Self {
        if credentials.is_empty() {
            warn!("No users configured; nobody will be able to log in");
        } else {
            info!("Loaded {} user account(s)", credentials.len());
        }
        Self {
            credentials,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AuthGate for LocalAuthGate {
    async fn create_session(&self, id_token: &str, ttl: Duration) -> Result<String, AuthError> {
        let username = validate_id_token(id_token, &self.credentials)?;

        let issued_at = SystemTime::now();
        let claims = UserClaims {
            username: username.clone(),
            issued_at,
            expires_at: issued_at + ttl,
        };
        let token = Uuid::new_v4().to_string();

        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, claims| claims.expires_at > issued_at);
        sessions.insert(token.clone(), claims);

        info!("Session created for {} ({} active)", username, sessions.len());
        Ok(token)
    }

    async fn verify_session(&self, token: &str) -> Result<UserClaims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingSession);
        }

        let mut sessions = self.sessions.lock().await;
        let claims = sessions.get(token).cloned().ok_or(AuthError::InvalidSession)?;

        if claims.expires_at <= SystemTime::now() {
            sessions.remove(token);
            return Err(AuthError::SessionExpired);
        }

        Ok(claims)
    }

    async fn revoke_session(&self, token: &str) {
        if let Some(claims) = self.sessions.lock().await.remove(token) {
            info!("Session revoked for {}", claims.username);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> LocalAuthGate {
        LocalAuthGate::new(CredentialStore::new(HashMap::from([(
            "alice".to_string(),
            "alice123".to_string(),
        )])))
    }

    #[tokio::test]
    async fn issued_session_verifies() {
        let gate = gate();
        let token = gate
            .create_session("alice:alice123", Duration::from_secs(60))
            .await
            .unwrap();

        let claims = gate.verify_session(&token).await.unwrap();
        assert_eq!(claims.username, "alice");
        assert!(claims.expires_at > claims.issued_at);
    }

    #[tokio::test]
    async fn bad_credentials_issue_nothing() {
        let gate = gate();
        assert!(gate
            .create_session("alice:wrong", Duration::from_secs(60))
            .await
            .is_err());
        assert_eq!(gate.sessions.lock().await.len(), 0);
    }

    #[tokio::test]
    async fn unknown_and_empty_tokens_are_rejected() {
        let gate = gate();
        assert!(matches!(
            gate.verify_session("forged").await,
            Err(AuthError::InvalidSession)
        ));
        assert!(matches!(gate.verify_session("").await, Err(AuthError::MissingSession)));
    }

    #[tokio::test]
    async fn expired_sessions_are_rejected_and_pruned() {
        let gate = gate();
        let token = gate.create_session("alice:alice123", Duration::ZERO).await.unwrap();

        assert!(matches!(
            gate.verify_session(&token).await,
            Err(AuthError::SessionExpired)
        ));
        assert_eq!(gate.sessions.lock().await.len(), 0);
    }

    #[tokio::test]
    async fn revoked_sessions_stop_working() {
        let gate = gate();
        let token = gate
            .create_session("alice:alice123", Duration::from_secs(60))
            .await
            .unwrap();
        gate.revoke_session(&token).await;
        assert!(gate.verify_session(&token).await.is_err());
    }
}
