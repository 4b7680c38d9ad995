//! The catalog's search and tag-filter engine.
//!
//! `find_resources` answers the search bar: an exact tag match (any casing)
//! wins and returns everything carrying that tag, otherwise the keyword is
//! treated as a name substring. `category` backs the per-type listing pages
//! and their optional `?tag=` filter.
//!
//! Both functions talk to persistence through [`CatalogStore`], so the
//! in-memory store in the kernel can stand in for Postgres in tests.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::catalog::models::{App, Dataset, Project};
use crate::kernel::traits::CatalogStore;

/// The three resource types the catalog knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Apps,
    Data,
    Projects,
}

impl ResourceKind {
    /// Parse a URL label. Unknown labels are `None`, not an error; callers
    /// render that as the null sentinel.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "apps" => Some(ResourceKind::Apps),
            "data" => Some(ResourceKind::Data),
            "projects" => Some(ResourceKind::Projects),
            _ => None,
        }
    }

    /// The segment detail URLs use: /app/{slug}, /data/{slug}, /project/{slug}.
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Apps => "app",
            ResourceKind::Data => "data",
            ResourceKind::Projects => "project",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Apps => write!(f, "apps"),
            ResourceKind::Data => write!(f, "data"),
            ResourceKind::Projects => write!(f, "projects"),
        }
    }
}

/// One result row, common to all three resource types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
}

impl From<App> for ResourceSummary {
    fn from(app: App) -> Self {
        Self {
            id: app.id.into_uuid(),
            name: app.name,
            slug: app.slug,
            description: app.description,
        }
    }
}

impl From<Dataset> for ResourceSummary {
    fn from(dataset: Dataset) -> Self {
        Self {
            id: dataset.id.into_uuid(),
            name: dataset.name,
            slug: dataset.slug,
            description: dataset.description,
        }
    }
}

impl From<Project> for ResourceSummary {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.into_uuid(),
            name: project.name,
            slug: project.slug,
            description: project.description,
        }
    }
}

/// Search results, one bucket per resource type.
///
/// Every bucket is always present; a query that matches nothing still
/// serializes all three keys with empty lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub apps: Vec<ResourceSummary>,
    pub data: Vec<ResourceSummary>,
    pub projects: Vec<ResourceSummary>,
}

/// A listing of one resource type, optionally narrowed by tag.
///
/// `results: None` is the sentinel for "the kind itself was unknown" and
/// serializes as JSON null. An empty vec is a real listing that matched
/// nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResults {
    pub results: Option<Vec<ResourceSummary>>,
}

/// Resolve a search keyword across all resource types.
///
/// The tag lookup is exact but case-insensitive, so "gis" finds everything
/// tagged "GIS". Without a matching tag the keyword falls back to a
/// case-insensitive name-substring match per type.
pub async fn find_resources(store: &dyn CatalogStore, keyword: &str) -> Result<SearchResults> {
    match store.find_tag_ci(keyword).await? {
        Some(tag) => Ok(SearchResults {
            apps: store.find_by_tag(ResourceKind::Apps, tag.id).await?,
            data: store.find_by_tag(ResourceKind::Data, tag.id).await?,
            projects: store.find_by_tag(ResourceKind::Projects, tag.id).await?,
        }),
        None => Ok(SearchResults {
            apps: store.find_matching(ResourceKind::Apps, keyword).await?,
            data: store.find_matching(ResourceKind::Data, keyword).await?,
            projects: store.find_matching(ResourceKind::Projects, keyword).await?,
        }),
    }
}

/// List one resource type, narrowed to a tag when one is given.
///
/// The tag lookup here is exact and case-sensitive. A missing tag, or any
/// failure while resolving it, degrades to an empty listing rather than an
/// error; listing pages never break because a filter link went stale. An
/// unknown kind yields the `None` sentinel.
pub async fn category(
    store: &dyn CatalogStore,
    kind: &str,
    tag: Option<&str>,
) -> Result<CategoryResults> {
    let Some(kind) = ResourceKind::parse(kind) else {
        return Ok(CategoryResults { results: None });
    };
    let results = match tag {
        Some(tag_name) => match tagged_resources(store, kind, tag_name).await {
            Ok(resources) => resources,
            Err(error) => {
                tracing::debug!(%error, tag = tag_name, "tag filter failed, listing nothing");
                Vec::new()
            }
        },
        None => store.find_all(kind).await?,
    };
    Ok(CategoryResults {
        results: Some(results),
    })
}

async fn tagged_resources(
    store: &dyn CatalogStore,
    kind: ResourceKind,
    tag_name: &str,
) -> Result<Vec<ResourceSummary>> {
    match store.find_tag(tag_name).await? {
        Some(tag) => store.find_by_tag(kind, tag.id).await,
        None => Ok(Vec::new()),
    }
}
