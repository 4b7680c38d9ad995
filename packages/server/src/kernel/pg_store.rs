// Postgres-backed CatalogStore
//
// Thin adapter: every method delegates to the domain models' queries and
// flattens the typed records into ResourceSummary rows.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::CatalogStore;
use crate::common::TagId;
use crate::domains::catalog::models::{App, Dataset, Project, Tag};
use crate::domains::catalog::search::{ResourceKind, ResourceSummary};

/// The production store behind the search engine.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn find_tag(&self, name: &str) -> Result<Option<Tag>> {
        Tag::find_by_name(name, &self.pool).await
    }

    async fn find_tag_ci(&self, name: &str) -> Result<Option<Tag>> {
        Tag::find_by_name_ci(name, &self.pool).await
    }

    async fn find_by_tag(
        &self,
        kind: ResourceKind,
        tag_id: TagId,
    ) -> Result<Vec<ResourceSummary>> {
        let results = match kind {
            ResourceKind::Apps => summaries(App::find_by_tag(tag_id, &self.pool).await?),
            ResourceKind::Data => summaries(Dataset::find_by_tag(tag_id, &self.pool).await?),
            ResourceKind::Projects => summaries(Project::find_by_tag(tag_id, &self.pool).await?),
        };
        Ok(results)
    }

    async fn find_matching(
        &self,
        kind: ResourceKind,
        keyword: &str,
    ) -> Result<Vec<ResourceSummary>> {
        let results = match kind {
            ResourceKind::Apps => summaries(App::find_matching(keyword, &self.pool).await?),
            ResourceKind::Data => summaries(Dataset::find_matching(keyword, &self.pool).await?),
            ResourceKind::Projects => {
                summaries(Project::find_matching(keyword, &self.pool).await?)
            }
        };
        Ok(results)
    }

    async fn find_all(&self, kind: ResourceKind) -> Result<Vec<ResourceSummary>> {
        let results = match kind {
            ResourceKind::Apps => summaries(App::find_all(&self.pool).await?),
            ResourceKind::Data => summaries(Dataset::find_all(&self.pool).await?),
            ResourceKind::Projects => summaries(Project::find_all(&self.pool).await?),
        };
        Ok(results)
    }

    async fn find_tags_matching(&self, fragment: &str) -> Result<Vec<Tag>> {
        Tag::find_matching(fragment, &self.pool).await
    }
}

fn summaries<T>(records: Vec<T>) -> Vec<ResourceSummary>
where
    T: Into<ResourceSummary>,
{
    records.into_iter().map(Into::into).collect()
}
