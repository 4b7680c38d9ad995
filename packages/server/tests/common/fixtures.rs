//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.
//! The database is shared across tests, so callers pass names unique to
//! their test.

use anyhow::Result;
use catalog_core::common::AccountId;
use catalog_core::domains::accounts::Account;
use catalog_core::domains::catalog::models::{App, Project, Tag};
use sqlx::PgPool;

/// Register a throwaway account
pub async fn create_test_account(pool: &PgPool, username: &str) -> Result<Account> {
    let email = format!("{username}@example.com");
    Account::register(username, &email, "correct-horse-battery", pool).await
}

/// Create an app carrying the given tags
pub async fn create_tagged_app(pool: &PgPool, name: &str, tags: &[&str]) -> Result<App> {
    let app = App::create(
        name,
        "An app built on city data",
        "https://example.com/app",
        pool,
    )
    .await?;
    let mut tag_ids = Vec::new();
    for tag in tags {
        tag_ids.push(Tag::find_or_create(tag, pool).await?.id);
    }
    App::set_tags(app.id, &tag_ids, pool).await?;
    Ok(app)
}

/// Create a project with a valid YouTube pitch video
pub async fn create_test_project(
    pool: &PgPool,
    name: &str,
    submitted_by: Option<AccountId>,
) -> Result<Project> {
    Project::create(
        name,
        "A civic project",
        "Office of New Urban Mechanics",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        None,
        submitted_by,
        pool,
    )
    .await
}
