pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod middleware;
pub mod navigate;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod transfer;

pub use server::Server;
