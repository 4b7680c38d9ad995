// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The search
// engine in the catalog domain runs against CatalogStore, so tests can
// swap Postgres out for the in-memory store.

use anyhow::Result;
use async_trait::async_trait;

use crate::common::TagId;
use crate::domains::catalog::models::Tag;
use crate::domains::catalog::search::{ResourceKind, ResourceSummary};

// =============================================================================
// Catalog Store Trait (persistence seam for the search engine)
// =============================================================================

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Exact, case-sensitive tag lookup
    async fn find_tag(&self, name: &str) -> Result<Option<Tag>>;

    /// Exact tag lookup in any casing
    async fn find_tag_ci(&self, name: &str) -> Result<Option<Tag>>;

    /// Records of one kind carrying the tag
    async fn find_by_tag(&self, kind: ResourceKind, tag_id: TagId)
        -> Result<Vec<ResourceSummary>>;

    /// Records of one kind whose name contains the keyword, in any casing
    async fn find_matching(
        &self,
        kind: ResourceKind,
        keyword: &str,
    ) -> Result<Vec<ResourceSummary>>;

    /// Every record of one kind, in submission order
    async fn find_all(&self, kind: ResourceKind) -> Result<Vec<ResourceSummary>>;

    /// Tags whose name contains the fragment, for autocomplete
    async fn find_tags_matching(&self, fragment: &str) -> Result<Vec<Tag>>;
}
