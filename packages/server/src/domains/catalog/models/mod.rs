//! Catalog domain models

pub mod app;
pub mod dataset;
pub mod project;
pub mod supporter;
pub mod tag;

pub use app::App;
pub use dataset::Dataset;
pub use project::Project;
pub use supporter::{Link, ProjectSupporter, Supporter};
pub use tag::Tag;
