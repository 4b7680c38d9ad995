// HTTP server setup (Axum)
pub mod app;
pub mod auth;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod static_files;

pub use app::*;
pub use errors::ApiError;
