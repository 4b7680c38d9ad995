use axum::{
    extract::{Extension, Path},
    response::Redirect,
    Json,
};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::common::TagId;
use crate::domains::catalog::forms::{parse_tags, AppForm, DatasetForm, ProjectForm};
use crate::domains::catalog::models::{App, Dataset, Project, Tag};
use crate::server::app::AppState;
use crate::server::errors::ApiError;
use crate::server::middleware::AuthUser;

/// Submissions are for logged-in members only; everyone else is sent to
/// sign in and brought back afterwards.
fn require_login(user: Option<Extension<AuthUser>>, next: &str) -> Result<AuthUser, ApiError> {
    match user {
        Some(Extension(user)) => Ok(user),
        None => Err(ApiError::login_required(next)),
    }
}

/// Resolve submitted tag names to records, creating the missing ones
async fn resolve_tags(tags: &str, pool: &PgPool) -> Result<Vec<TagId>, ApiError> {
    let mut tag_ids = Vec::new();
    for name in parse_tags(tags) {
        let tag = Tag::find_or_create(&name, pool).await?;
        tag_ids.push(tag.id);
    }
    Ok(tag_ids)
}

fn joined_names(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Submission
// =============================================================================

pub async fn submit_app_page(user: Option<Extension<AuthUser>>) -> Result<Json<Value>, ApiError> {
    require_login(user, "/submit/app")?;
    Ok(Json(json!({
        "resource": "app",
        "fields": ["name", "description", "url", "tags"],
    })))
}

pub async fn submit_app(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(form): Json<AppForm>,
) -> Result<Redirect, ApiError> {
    require_login(user, "/submit/app")?;
    form.validate().map_err(ApiError::Validation)?;

    let app = App::create(
        form.name.trim(),
        form.description.trim(),
        form.url.trim(),
        &state.db_pool,
    )
    .await?;
    let tag_ids = resolve_tags(&form.tags, &state.db_pool).await?;
    App::set_tags(app.id, &tag_ids, &state.db_pool).await?;

    tracing::info!(slug = %app.slug, "app submitted");
    Ok(Redirect::to("/thanks"))
}

pub async fn submit_dataset_page(
    user: Option<Extension<AuthUser>>,
) -> Result<Json<Value>, ApiError> {
    require_login(user, "/submit/data")?;
    Ok(Json(json!({
        "resource": "data",
        "fields": ["name", "description", "url", "tags"],
    })))
}

pub async fn submit_dataset(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(form): Json<DatasetForm>,
) -> Result<Redirect, ApiError> {
    require_login(user, "/submit/data")?;
    form.validate().map_err(ApiError::Validation)?;

    let dataset = Dataset::create(
        form.name.trim(),
        form.description.trim(),
        form.url_value(),
        &state.db_pool,
    )
    .await?;
    let tag_ids = resolve_tags(&form.tags, &state.db_pool).await?;
    Dataset::set_tags(dataset.id, &tag_ids, &state.db_pool).await?;

    tracing::info!(slug = %dataset.slug, "dataset submitted");
    Ok(Redirect::to("/thanks"))
}

pub async fn submit_project_page(
    user: Option<Extension<AuthUser>>,
) -> Result<Json<Value>, ApiError> {
    require_login(user, "/submit/project")?;
    Ok(Json(json!({
        "resource": "project",
        "fields": ["name", "description", "organization", "video_url", "image", "tags"],
    })))
}

pub async fn submit_project(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Json(form): Json<ProjectForm>,
) -> Result<Redirect, ApiError> {
    let user = require_login(user, "/submit/project")?;
    form.validate().map_err(ApiError::Validation)?;

    let project = Project::create(
        form.name.trim(),
        form.description.trim(),
        form.organization.trim(),
        form.video_url.trim(),
        form.image_value(),
        Some(user.account_id),
        &state.db_pool,
    )
    .await?;
    let tag_ids = resolve_tags(&form.tags, &state.db_pool).await?;
    Project::set_tags(project.id, &tag_ids, &state.db_pool).await?;

    tracing::info!(slug = %project.slug, "project submitted");
    Ok(Redirect::to("/thanks"))
}

// =============================================================================
// Editing
// =============================================================================

/// The slugless form of the edit URL has nothing to edit
pub async fn edit_landing() -> Redirect {
    Redirect::to("/projects")
}

pub async fn edit_app_page(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_login(user, &format!("/edit/app/{slug}"))?;
    let app = App::find_by_slug(&slug, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;
    let tags = Tag::find_for_app(app.id, &state.db_pool).await?;
    Ok(Json(json!({
        "resource": "app",
        "values": {
            "name": app.name,
            "description": app.description,
            "url": app.url,
            "tags": joined_names(&tags),
        },
    })))
}

pub async fn edit_app(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(slug): Path<String>,
    Json(form): Json<AppForm>,
) -> Result<Redirect, ApiError> {
    require_login(user, &format!("/edit/app/{slug}"))?;
    form.validate().map_err(ApiError::Validation)?;

    let app = App::find_by_slug(&slug, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;
    let app = App::update(
        app.id,
        form.name.trim(),
        form.description.trim(),
        form.url.trim(),
        &state.db_pool,
    )
    .await?;
    let tag_ids = resolve_tags(&form.tags, &state.db_pool).await?;
    App::set_tags(app.id, &tag_ids, &state.db_pool).await?;

    Ok(Redirect::to(&format!("/app/{}", app.slug)))
}

pub async fn edit_dataset_page(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_login(user, &format!("/edit/data/{slug}"))?;
    let dataset = Dataset::find_by_slug(&slug, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;
    let tags = Tag::find_for_dataset(dataset.id, &state.db_pool).await?;
    Ok(Json(json!({
        "resource": "data",
        "values": {
            "name": dataset.name,
            "description": dataset.description,
            "url": dataset.url,
            "tags": joined_names(&tags),
        },
    })))
}

pub async fn edit_dataset(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(slug): Path<String>,
    Json(form): Json<DatasetForm>,
) -> Result<Redirect, ApiError> {
    require_login(user, &format!("/edit/data/{slug}"))?;
    form.validate().map_err(ApiError::Validation)?;

    let dataset = Dataset::find_by_slug(&slug, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;
    let dataset = Dataset::update(
        dataset.id,
        form.name.trim(),
        form.description.trim(),
        form.url_value(),
        &state.db_pool,
    )
    .await?;
    let tag_ids = resolve_tags(&form.tags, &state.db_pool).await?;
    Dataset::set_tags(dataset.id, &tag_ids, &state.db_pool).await?;

    Ok(Redirect::to(&format!("/data/{}", dataset.slug)))
}

pub async fn edit_project_page(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, ApiError> {
    require_login(user, &format!("/edit/project/{slug}"))?;
    let project = Project::find_by_slug(&slug, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;
    let tags = Tag::find_for_project(project.id, &state.db_pool).await?;
    Ok(Json(json!({
        "resource": "project",
        "values": {
            "name": project.name,
            "description": project.description,
            "organization": project.organization,
            "video_url": project.video_url,
            "image": project.image,
            "tags": joined_names(&tags),
        },
    })))
}

pub async fn edit_project(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(slug): Path<String>,
    Json(form): Json<ProjectForm>,
) -> Result<Redirect, ApiError> {
    require_login(user, &format!("/edit/project/{slug}"))?;
    form.validate().map_err(ApiError::Validation)?;

    let project = Project::find_by_slug(&slug, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;
    let project = Project::update(
        project.id,
        form.name.trim(),
        form.description.trim(),
        form.organization.trim(),
        form.video_url.trim(),
        form.image_value(),
        &state.db_pool,
    )
    .await?;
    let tag_ids = resolve_tags(&form.tags, &state.db_pool).await?;
    Project::set_tags(project.id, &tag_ids, &state.db_pool).await?;

    Ok(Redirect::to(&format!("/project/{}", project.slug)))
}

// =============================================================================
// My projects
// =============================================================================

/// Projects the signed-in member has submitted
pub async fn my_projects(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
) -> Result<Json<Value>, ApiError> {
    let user = require_login(user, "/my/projects")?;
    let projects = Project::find_by_submitter(user.account_id, &state.db_pool).await?;
    Ok(Json(json!({ "projects": projects })))
}
