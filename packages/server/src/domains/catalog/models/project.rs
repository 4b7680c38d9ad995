use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{next_available, slugify, AccountId, ProjectId, TagId};
use crate::domains::catalog::video;

/// A civic project pitched with a video. At most one project is featured on
/// the home page at any time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub organization: String,
    pub video_url: String,
    pub embed_url: String,
    pub image: Option<String>,
    pub featured: bool,
    pub submitted_by: Option<AccountId>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Create a project. The embed URL is derived from the video URL; an
    /// unrecognized video host fails the whole save. The slug is derived
    /// from the name here and never regenerated afterwards.
    pub async fn create(
        name: &str,
        description: &str,
        organization: &str,
        video_url: &str,
        image: Option<&str>,
        submitted_by: Option<AccountId>,
        pool: &PgPool,
    ) -> Result<Self> {
        let embed_url = video::embed_url(video_url)?;
        let slug = Self::available_slug(name, pool).await?;
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (id, name, slug, description, organization, video_url, embed_url, image, submitted_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(ProjectId::new())
        .bind(name)
        .bind(&slug)
        .bind(description)
        .bind(organization)
        .bind(video_url)
        .bind(&embed_url)
        .bind(image)
        .bind(submitted_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Replace the editable fields, re-deriving the embed URL. The slug and
    /// the featured flag are untouched.
    pub async fn update(
        id: ProjectId,
        name: &str,
        description: &str,
        organization: &str,
        video_url: &str,
        image: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        let embed_url = video::embed_url(video_url)?;
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $2, description = $3, organization = $4, video_url = $5, embed_url = $6, image = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(organization)
        .bind(video_url)
        .bind(&embed_url)
        .bind(image)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Make this the featured project.
    ///
    /// Clears the flag everywhere and sets it on the target inside one
    /// transaction, so two racing calls still leave exactly one row featured.
    pub async fn feature(id: ProjectId, pool: &PgPool) -> Result<Self> {
        let mut tx = pool.begin().await?;
        sqlx::query("UPDATE projects SET featured = FALSE WHERE featured")
            .execute(&mut *tx)
            .await?;
        let project =
            sqlx::query_as::<_, Project>("UPDATE projects SET featured = TRUE WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        tx.commit().await?;
        Ok(project)
    }

    /// The currently featured project, if any
    pub async fn featured_project(pool: &PgPool) -> Result<Option<Self>> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE featured LIMIT 1")
            .fetch_optional(pool)
            .await?;
        Ok(project)
    }

    /// Find a project by slug
    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        Ok(project)
    }

    /// All projects in submission order
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let projects = sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at, id")
            .fetch_all(pool)
            .await?;
        Ok(projects)
    }

    /// Projects carrying the given tag
    pub async fn find_by_tag(tag_id: TagId, pool: &PgPool) -> Result<Vec<Self>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.*
            FROM projects p
            INNER JOIN project_tags pt ON pt.project_id = p.id
            WHERE pt.tag_id = $1
            ORDER BY p.created_at, p.id
            "#,
        )
        .bind(tag_id)
        .fetch_all(pool)
        .await?;
        Ok(projects)
    }

    /// Projects whose name contains the keyword, in any casing
    pub async fn find_matching(keyword: &str, pool: &PgPool) -> Result<Vec<Self>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE name ILIKE '%' || $1 || '%' ORDER BY created_at, id",
        )
        .bind(keyword)
        .fetch_all(pool)
        .await?;
        Ok(projects)
    }

    /// Projects submitted by the given account
    pub async fn find_by_submitter(account_id: AccountId, pool: &PgPool) -> Result<Vec<Self>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE submitted_by = $1 ORDER BY created_at, id",
        )
        .bind(account_id)
        .fetch_all(pool)
        .await?;
        Ok(projects)
    }

    /// Replace the project's tag set in one transaction.
    pub async fn set_tags(id: ProjectId, tag_ids: &[TagId], pool: &PgPool) -> Result<()> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM project_tags WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for tag_id in tag_ids {
            sqlx::query(
                r#"
                INSERT INTO project_tags (id, project_id, tag_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (project_id, tag_id) DO NOTHING
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

    /// Next free slug for a name within the projects table.
    async fn available_slug(name: &str, pool: &PgPool) -> Result<String> {
        let base = slugify(name);
        let taken = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM projects WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(&base)
        .fetch_all(pool)
        .await?;
        Ok(next_available(&base, &taken))
    }
}
