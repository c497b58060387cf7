//! Authentication system
//!
//! Exchanges verified identity tokens for session cookies and checks those
//! cookies on every protected request.

pub mod credentials;
pub mod gate;
pub mod session;
pub mod validator;

pub use credentials::CredentialStore;
pub use gate::{AuthGate, LocalAuthGate};
pub use session::UserClaims;
