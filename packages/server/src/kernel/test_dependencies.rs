// MemoryCatalog - in-memory CatalogStore for tests
//
// Holds tags and per-kind records behind a Mutex so engine and route tests
// never need a database.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

use super::traits::CatalogStore;
use crate::common::{slugify, TagId};
use crate::domains::catalog::models::Tag;
use crate::domains::catalog::search::{ResourceKind, ResourceSummary};

struct MemoryRecord {
    kind: ResourceKind,
    summary: ResourceSummary,
    tag_ids: Vec<TagId>,
}

#[derive(Default)]
struct MemoryCatalogState {
    tags: Vec<Tag>,
    records: Vec<MemoryRecord>,
    fail_tag_lookups: bool,
}

/// In-memory stand-in for the Postgres store.
#[derive(Default)]
pub struct MemoryCatalog {
    state: Mutex<MemoryCatalogState>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tag and return it
    pub fn add_tag(&self, name: &str) -> Tag {
        let tag = Tag {
            id: TagId::new(),
            name: name.to_string(),
            slug: slugify(name),
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().tags.push(tag.clone());
        tag
    }

    /// Seed a record of one kind, attached to the given tags
    pub fn add_record(&self, kind: ResourceKind, name: &str, tag_ids: &[TagId]) -> ResourceSummary {
        let summary = ResourceSummary {
            id: Uuid::now_v7(),
            name: name.to_string(),
            slug: slugify(name),
            description: format!("{name} description"),
        };
        self.state.lock().unwrap().records.push(MemoryRecord {
            kind,
            summary: summary.clone(),
            tag_ids: tag_ids.to_vec(),
        });
        summary
    }

    /// Make every tag lookup fail, to exercise the degraded paths
    pub fn fail_tag_lookups(&self) {
        self.state.lock().unwrap().fail_tag_lookups = true;
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_tag(&self, name: &str) -> Result<Option<Tag>> {
        let state = self.state.lock().unwrap();
        if state.fail_tag_lookups {
            return Err(anyhow!("tag lookups are failing"));
        }
        Ok(state.tags.iter().find(|tag| tag.name == name).cloned())
    }

    async fn find_tag_ci(&self, name: &str) -> Result<Option<Tag>> {
        let state = self.state.lock().unwrap();
        if state.fail_tag_lookups {
            return Err(anyhow!("tag lookups are failing"));
        }
        Ok(state
            .tags
            .iter()
            .find(|tag| tag.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn find_by_tag(
        &self,
        kind: ResourceKind,
        tag_id: TagId,
    ) -> Result<Vec<ResourceSummary>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .filter(|record| record.kind == kind && record.tag_ids.contains(&tag_id))
            .map(|record| record.summary.clone())
            .collect())
    }

    async fn find_matching(
        &self,
        kind: ResourceKind,
        keyword: &str,
    ) -> Result<Vec<ResourceSummary>> {
        let keyword = keyword.to_lowercase();
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .filter(|record| {
                record.kind == kind && record.summary.name.to_lowercase().contains(&keyword)
            })
            .map(|record| record.summary.clone())
            .collect())
    }

    async fn find_all(&self, kind: ResourceKind) -> Result<Vec<ResourceSummary>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .filter(|record| record.kind == kind)
            .map(|record| record.summary.clone())
            .collect())
    }

    async fn find_tags_matching(&self, fragment: &str) -> Result<Vec<Tag>> {
        let fragment = fragment.to_lowercase();
        let state = self.state.lock().unwrap();
        Ok(state
            .tags
            .iter()
            .filter(|tag| tag.name.to_lowercase().contains(&fragment))
            .cloned()
            .collect())
    }
}
