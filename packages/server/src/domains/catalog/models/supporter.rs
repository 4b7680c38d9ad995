use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{AccountId, LinkId, ProjectId, SupporterId};
use crate::domains::catalog::models::Project;

/// An account's supporter record. Created lazily the first time the account
/// supports a project; an account has at most one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Supporter {
    pub id: SupporterId,
    pub account_id: AccountId,
    pub created_at: DateTime<Utc>,
}

/// A link a supporter shares on their profile, e.g. an app or a repository.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Link {
    pub id: LinkId,
    pub supporter_id: SupporterId,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A supporter joined with the owning account, for project detail pages.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectSupporter {
    pub id: SupporterId,
    pub username: String,
}

impl Supporter {
    /// The account's supporter record, creating it if this is the first
    /// project they support.
    pub async fn find_or_create(account_id: AccountId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Supporter>(
            r#"
            INSERT INTO supporters (id, account_id)
            VALUES ($1, $2)
            ON CONFLICT (account_id) DO UPDATE SET account_id = EXCLUDED.account_id
            RETURNING *
            "#,
        )
        .bind(SupporterId::new())
        .bind(account_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Record the account as a supporter of the project. Supporting the same
    /// project twice is a no-op.
    pub async fn add_project(
        account_id: AccountId,
        project_id: ProjectId,
        pool: &PgPool,
    ) -> Result<Self> {
        let supporter = Self::find_or_create(account_id, pool).await?;
        sqlx::query(
            r#"
            INSERT INTO supporter_projects (id, supporter_id, project_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (supporter_id, project_id) DO NOTHING
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(supporter.id)
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(supporter)
    }

    /// Withdraw the account's support. The supporter record itself stays.
    pub async fn remove_project(
        account_id: AccountId,
        project_id: ProjectId,
        pool: &PgPool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM supporter_projects sp
            USING supporters s
            WHERE sp.supporter_id = s.id AND s.account_id = $1 AND sp.project_id = $2
            "#,
        )
        .bind(account_id)
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find the supporter record for an account
    pub async fn find_by_account(account_id: AccountId, pool: &PgPool) -> Result<Option<Self>> {
        let supporter = sqlx::query_as::<_, Supporter>("SELECT * FROM supporters WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(pool)
            .await?;
        Ok(supporter)
    }

    /// Everyone supporting the project, with their usernames
    pub async fn find_for_project(project_id: ProjectId, pool: &PgPool) -> Result<Vec<ProjectSupporter>> {
        let supporters = sqlx::query_as::<_, ProjectSupporter>(
            r#"
            SELECT s.id, a.username
            FROM supporters s
            INNER JOIN accounts a ON a.id = s.account_id
            INNER JOIN supporter_projects sp ON sp.supporter_id = s.id
            WHERE sp.project_id = $1
            ORDER BY a.username
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(supporters)
    }

    /// The projects this supporter has signed on to
    pub async fn projects(supporter_id: SupporterId, pool: &PgPool) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.*
            FROM projects p
            INNER JOIN supporter_projects sp ON sp.project_id = p.id
            WHERE sp.supporter_id = $1
            ORDER BY p.created_at, p.id
            "#,
        )
        .bind(supporter_id)
        .fetch_all(pool)
        .await?;
        Ok(projects)
    }
}

impl Link {
    /// Attach a link to a supporter's profile
    pub async fn create(supporter_id: SupporterId, url: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Link>(
            "INSERT INTO links (id, supporter_id, url) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(LinkId::new())
        .bind(supporter_id)
        .bind(url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// All links on a supporter's profile
    pub async fn find_for_supporter(supporter_id: SupporterId, pool: &PgPool) -> Result<Vec<Self>> {
        let links = sqlx::query_as::<_, Link>(
            "SELECT * FROM links WHERE supporter_id = $1 ORDER BY created_at, id",
        )
        .bind(supporter_id)
        .fetch_all(pool)
        .await?;
        Ok(links)
    }
}
