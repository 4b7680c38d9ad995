//! Kernel module - server infrastructure and dependencies.

pub mod pg_store;
pub mod test_dependencies;
pub mod traits;

pub use pg_store::PgCatalogStore;
pub use test_dependencies::MemoryCatalog;
pub use traits::*;
