//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.
//!
//! # Example
//!
//! ```rust
//! use catalog_core::common::{AppId, ProjectId, TagId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let app_id: AppId = AppId::new();
//! let tag_id: TagId = TagId::new();
//!
//! // This would be a compile error:
//! // let wrong: TagId = app_id;
//! ```

// Re-export the core Id type
pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for App entities (submitted applications).
pub struct App;

/// Marker type for Dataset entities (submitted data).
pub struct Dataset;

/// Marker type for Project entities (civic projects / causes).
pub struct Project;

/// Marker type for Tag entities.
pub struct Tag;

/// Marker type for Account entities (registered users).
pub struct Account;

/// Marker type for Supporter entities (a user's project-support record).
pub struct Supporter;

/// Marker type for Link entities (URLs attached to a supporter).
pub struct Link;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for App entities.
pub type AppId = Id<App>;

/// Typed ID for Dataset entities.
pub type DatasetId = Id<Dataset>;

/// Typed ID for Project entities.
pub type ProjectId = Id<Project>;

/// Typed ID for Tag entities.
pub type TagId = Id<Tag>;

/// Typed ID for Account entities.
pub type AccountId = Id<Account>;

/// Typed ID for Supporter entities.
pub type SupporterId = Id<Supporter>;

/// Typed ID for Link entities.
pub type LinkId = Id<Link>;
