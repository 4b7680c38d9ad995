use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{next_available, slugify, DatasetId, TagId};

/// A dataset the city publishes. The URL is optional because some sets are
/// catalogued before they have a public home.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Dataset {
    /// Create a dataset. The slug is derived from the name here and never
    /// regenerated afterwards.
    pub async fn create(
        name: &str,
        description: &str,
        url: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        let slug = Self::available_slug(name, pool).await?;
        sqlx::query_as::<_, Dataset>(
            r#"
            INSERT INTO datasets (id, name, slug, description, url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(DatasetId::new())
        .bind(name)
        .bind(&slug)
        .bind(description)
        .bind(url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Replace the editable fields. The slug stays what creation picked.
    pub async fn update(
        id: DatasetId,
        name: &str,
        description: &str,
        url: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Dataset>(
            "UPDATE datasets SET name = $2, description = $3, url = $4 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Find a dataset by slug
    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        let dataset = sqlx::query_as::<_, Dataset>("SELECT * FROM datasets WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        Ok(dataset)
    }

    /// All datasets in submission order
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let datasets = sqlx::query_as::<_, Dataset>("SELECT * FROM datasets ORDER BY created_at, id")
            .fetch_all(pool)
            .await?;
        Ok(datasets)
    }

    /// Datasets carrying the given tag
    pub async fn find_by_tag(tag_id: TagId, pool: &PgPool) -> Result<Vec<Self>> {
        let datasets = sqlx::query_as::<_, Dataset>(
            r#"
            SELECT d.*
            FROM datasets d
            INNER JOIN dataset_tags dt ON dt.dataset_id = d.id
            WHERE dt.tag_id = $1
            ORDER BY d.created_at, d.id
            "#,
        )
        .bind(tag_id)
        .fetch_all(pool)
        .await?;
        Ok(datasets)
    }

    /// Datasets whose name contains the keyword, in any casing
    pub async fn find_matching(keyword: &str, pool: &PgPool) -> Result<Vec<Self>> {
        let datasets = sqlx::query_as::<_, Dataset>(
            "SELECT * FROM datasets WHERE name ILIKE '%' || $1 || '%' ORDER BY created_at, id",
        )
        .bind(keyword)
        .fetch_all(pool)
        .await?;
        Ok(datasets)
    }

    /// Replace the dataset's tag set in one transaction.
    pub async fn set_tags(id: DatasetId, tag_ids: &[TagId], pool: &PgPool) -> Result<()> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM dataset_tags WHERE dataset_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for tag_id in tag_ids {
            sqlx::query(
                r#"
                INSERT INTO dataset_tags (id, dataset_id, tag_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (dataset_id, tag_id) DO NOTHING
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Next free slug for a name within the datasets table.
    async fn available_slug(name: &str, pool: &PgPool) -> Result<String> {
        let base = slugify(name);
        let taken = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM datasets WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(&base)
        .fetch_all(pool)
        .await?;
        Ok(next_available(&base, &taken))
    }
}
