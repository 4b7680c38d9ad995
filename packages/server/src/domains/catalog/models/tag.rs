use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{next_available, slugify, AppId, DatasetId, ProjectId, TagId};

/// A tag shared by all three resource types.
///
/// Names are unique case-insensitively, so "GIS" and "gis" are the same tag.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a tag outright. A name that already exists (in any casing)
    /// surfaces as a uniqueness violation.
    pub async fn create(name: &str, pool: &PgPool) -> Result<Self> {
        let slug = Self::available_slug(name, pool).await?;
        sqlx::query_as::<_, Tag>("INSERT INTO tags (id, name, slug) VALUES ($1, $2, $3) RETURNING *")
            .bind(TagId::new())
            .bind(name)
            .bind(&slug)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Find a tag by name in any casing, creating it if missing.
    ///
    /// This is the only creation path resource submission uses, so typing
    /// "gis" in a form reuses an existing "GIS" tag instead of failing.
    pub async fn find_or_create(name: &str, pool: &PgPool) -> Result<Self> {
        if let Some(tag) = Self::find_by_name_ci(name, pool).await? {
            return Ok(tag);
        }
        let slug = Self::available_slug(name, pool).await?;
        // Another request may have inserted the same name since the lookup.
        sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, name, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT ((LOWER(name))) DO UPDATE SET name = tags.name
            RETURNING *
            "#,
        )
        .bind(TagId::new())
        .bind(name)
        .bind(&slug)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Find a tag by exact name, case-sensitively.
    pub async fn find_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(tag)
    }

    /// Find a tag by exact name in any casing.
    pub async fn find_by_name_ci(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(tag)
    }

    /// Find tags whose name contains the fragment, for autocomplete.
    pub async fn find_matching(fragment: &str, pool: &PgPool) -> Result<Vec<Self>> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT * FROM tags WHERE name ILIKE '%' || $1 || '%' ORDER BY name",
        )
        .bind(fragment)
        .fetch_all(pool)
        .await?;
        Ok(tags)
    }

    /// Find all tags attached to an app
    pub async fn find_for_app(app_id: AppId, pool: &PgPool) -> Result<Vec<Self>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.*
            FROM tags t
            INNER JOIN app_tags at ON at.tag_id = t.id
            WHERE at.app_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(app_id)
        .fetch_all(pool)
        .await?;
        Ok(tags)
    }

    /// Find all tags attached to a dataset
    pub async fn find_for_dataset(dataset_id: DatasetId, pool: &PgPool) -> Result<Vec<Self>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.*
            FROM tags t
            INNER JOIN dataset_tags dt ON dt.tag_id = t.id
            WHERE dt.dataset_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(dataset_id)
        .fetch_all(pool)
        .await?;
        Ok(tags)
    }

    /// Find all tags attached to a project
    pub async fn find_for_project(project_id: ProjectId, pool: &PgPool) -> Result<Vec<Self>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.*
            FROM tags t
            INNER JOIN project_tags pt ON pt.tag_id = t.id
            WHERE pt.project_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(tags)
    }

    /// Next free slug for a tag name within the tags table.
    async fn available_slug(name: &str, pool: &PgPool) -> Result<String> {
        let base = slugify(name);
        let taken = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM tags WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(&base)
        .fetch_all(pool)
        .await?;
        Ok(next_available(&base, &taken))
    }
}
