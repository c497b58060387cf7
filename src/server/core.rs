use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Router, middleware};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::auth::{CredentialStore, LocalAuthGate};
use crate::config::ServerConfig;
use crate::middleware::{log_requests, require_session};
use crate::protocol::handlers;
use crate::server::state::AppState;
use crate::storage::StorageRoot;

pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Prepare the storage root, the auth gate and the listener.
    pub async fn new(config: ServerConfig) -> Result<Self, std::io::Error> {
        let root = StorageRoot::open(&config.storage_root_path()).map_err(|e| {
            error!("Failed to prepare storage root {}: {}", config.storage_root, e);
            e
        })?;
        info!("Storage root: {}", root.path().display());

        let gate = Arc::new(LocalAuthGate::new(CredentialStore::new(config.users.clone())));
        let state = Arc::new(AppState::new(&config, root, gate));

        let addr = config.listen_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Server bound to {}", addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", addr, e);
                return Err(e);
            }
        };

        Ok(Self { listener, state })
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        info!(
            "Starting RAX docs server on {} (max {} files / upload)",
            self.listener.local_addr()?,
            self.state.upload_limits.max_files
        );

        let app = build_router(self.state);
        axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

/// Create the router
pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.upload_limits.body_limit());

    let protected = Router::new()
        .route("/", get(handlers::show_root))
        .route("/folder", get(handlers::show_root))
        .route("/folder/*path", get(handlers::show_folder))
        .route(
            "/file/*path",
            get(handlers::show_file).delete(handlers::delete_file),
        )
        .route("/files/*path", get(handlers::raw_file))
        .route("/edit/*path", get(handlers::edit_form))
        .route("/edit", post(handlers::edit_file))
        .route("/create", post(handlers::create_document))
        .route("/create-folder", post(handlers::create_folder))
        .route("/create-semester", post(handlers::create_semester))
        .route(
            "/upload",
            post(handlers::upload_root).layer(upload_limit.clone()),
        )
        .route(
            "/upload/*path",
            post(handlers::upload_nested).layer(upload_limit),
        )
        .route("/settings", get(handlers::settings))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_session,
        ));

    Router::new()
        .route("/login", get(handlers::login_page))
        .route("/signup", get(handlers::signup_page))
        .route("/sessionLogin", post(handlers::session_login))
        .route("/logout", get(handlers::logout))
        .merge(protected)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server");
}
