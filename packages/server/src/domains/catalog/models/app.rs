use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{next_available, slugify, AppId, TagId};

/// An application someone built on top of the catalog's data.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct App {
    pub id: AppId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl App {
    /// Create an app. The slug is derived from the name here and never
    /// regenerated afterwards.
    pub async fn create(name: &str, description: &str, url: &str, pool: &PgPool) -> Result<Self> {
        let slug = Self::available_slug(name, pool).await?;
        sqlx::query_as::<_, App>(
            r#"
            INSERT INTO apps (id, name, slug, description, url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(AppId::new())
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
        id: AppId,
        name: &str,
        description: &str,
        url: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, App>(
            "UPDATE apps SET name = $2, description = $3, url = $4 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Find an app by slug
    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        let app = sqlx::query_as::<_, App>("SELECT * FROM apps WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        Ok(app)
    }

    /// All apps in submission order
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let apps = sqlx::query_as::<_, App>("SELECT * FROM apps ORDER BY created_at, id")
            .fetch_all(pool)
            .await?;
        Ok(apps)
    }

    /// Apps carrying the given tag
    pub async fn find_by_tag(tag_id: TagId, pool: &PgPool) -> Result<Vec<Self>> {
        let apps = sqlx::query_as::<_, App>(
            r#"
            SELECT a.*
            FROM apps a
            INNER JOIN app_tags at ON at.app_id = a.id
            WHERE at.tag_id = $1
            ORDER BY a.created_at, a.id
            "#,
        )
        .bind(tag_id)
        .fetch_all(pool)
        .await?;
        Ok(apps)
    }

    /// Apps whose name contains the keyword, in any casing
    pub async fn find_matching(keyword: &str, pool: &PgPool) -> Result<Vec<Self>> {
        let apps = sqlx::query_as::<_, App>(
            "SELECT * FROM apps WHERE name ILIKE '%' || $1 || '%' ORDER BY created_at, id",
        )
        .bind(keyword)
        .fetch_all(pool)
        .await?;
        Ok(apps)
    }

    /// Replace the app's tag set in one transaction.
    pub async fn set_tags(id: AppId, tag_ids: &[TagId], pool: &PgPool) -> Result<()> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM app_tags WHERE app_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for tag_id in tag_ids {
            sqlx::query(
                r#"
                INSERT INTO app_tags (id, app_id, tag_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (app_id, tag_id) DO NOTHING
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

    /// Next free slug for a name within the apps table.
    async fn available_slug(name: &str, pool: &PgPool) -> Result<String> {
        let base = slugify(name);
        let taken = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM apps WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(&base)
        .fetch_all(pool)
        .await?;
        Ok(next_available(&base, &taken))
    }
}
