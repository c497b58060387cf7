//! Session middleware
//!
//! Rejects requests without a valid session cookie by redirecting to the
//! login page. Valid sessions attach their `UserClaims` to the request.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use log::debug;
use std::sync::Arc;

use crate::server::AppState;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .unwrap_or_default();

    match state.gate.verify_session(&token).await {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            debug!("Rejected {} {}: {}", req.method(), req.uri().path(), e);
            Redirect::to("/login").into_response()
        }
    }
}
