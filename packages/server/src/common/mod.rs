// Common types and utilities shared across the application

pub mod entity_ids;
pub mod id;
pub mod pagination;
pub mod slug;

pub use entity_ids::*;
pub use id::Id;
pub use pagination::Page;
pub use slug::{next_available, slugify};
