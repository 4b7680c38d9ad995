// Open Data Catalog - API Core
//
// This crate provides the backend for a municipal open-data catalog:
// visitors browse and search submitted apps, datasets, and civic projects,
// filter them by tag, and support the projects they care about.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
