//! RAX Docs Server - Entry Point
//!
//! A small authenticated document manager: browse a folder tree, upload,
//! edit and view notes, PDFs and images in the browser.

use log::{error, info};

use rax_docs_server::Server;
use rax_docs_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Launching docs server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        error!("Server stopped with error: {}", e);
        std::process::exit(1);
    }
}
