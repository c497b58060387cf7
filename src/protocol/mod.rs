//! HTTP protocol surface
//!
//! Request bodies, response bodies, HTML views and the route handlers that
//! tie them to storage.

pub mod handlers;
pub mod requests;
pub mod responses;
pub mod views;
