//! Catalog domain - the resources the city publishes and the people around them
//!
//! Three resource types share one shape: a named, slugged, described record
//! with a set of tags. Apps point at a live site, datasets point at the raw
//! file or API, and projects carry a video pitch plus the supporters who
//! signed on. The search engine and the tag-scoped listings both live here.

pub mod errors;
pub mod forms;
pub mod models;
pub mod search;
pub mod video;

// Re-export models
pub use models::{App, Dataset, Link, Project, Supporter, Tag};

// Re-export the search engine types
pub use search::{category, find_resources, CategoryResults, ResourceKind, ResourceSummary, SearchResults};

pub use errors::CatalogError;
