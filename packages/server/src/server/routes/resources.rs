use axum::{
    extract::{Extension, Path, Query},
    response::Redirect,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::pagination::paginate;
use crate::domains::catalog::models::{App, Dataset, Project, Supporter, Tag};
use crate::domains::catalog::search::{category, ResourceKind};
use crate::server::app::AppState;
use crate::server::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListingParams {
    pub tag: Option<String>,
    pub page: Option<String>,
}

pub async fn apps(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiError> {
    listing(&state, ResourceKind::Apps, &params).await
}

pub async fn data(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiError> {
    listing(&state, ResourceKind::Data, &params).await
}

pub async fn projects(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ApiError> {
    listing(&state, ResourceKind::Projects, &params).await
}

/// One page of one resource type, optionally narrowed by tag
async fn listing(
    state: &AppState,
    kind: ResourceKind,
    params: &ListingParams,
) -> Result<Json<Value>, ApiError> {
    let found = category(state.store.as_ref(), &kind.to_string(), params.tag.as_deref()).await?;
    // The kind label is fixed here, so the unknown-kind sentinel cannot fire
    let items = found.results.unwrap_or_default();
    let resources = paginate(items, params.page.as_deref(), state.page_size);
    Ok(Json(json!({
        "path": kind.singular(),
        "resources": resources,
        "breadcrumb": kind.to_string(),
    })))
}

/// One app, with its tags
pub async fn app_detail(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let app = App::find_by_slug(&slug, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;
    let tags = Tag::find_for_app(app.id, &state.db_pool).await?;
    Ok(Json(json!({
        "resource": app,
        "tags": tags,
        "path": "app",
        "resource_type": "app",
        "breadcrumb": "apps",
    })))
}

/// One project, with its tags and the people supporting it
pub async fn project_detail(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let project = Project::find_by_slug(&slug, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;
    let tags = Tag::find_for_project(project.id, &state.db_pool).await?;
    let supporters = Supporter::find_for_project(project.id, &state.db_pool).await?;
    Ok(Json(json!({
        "resource": project,
        "tags": tags,
        "supporters": supporters,
        "path": "project",
        "resource_type": "project",
        "breadcrumb": "projects",
    })))
}

/// Datasets have no detail page; the slug link goes straight to the data itself
pub async fn dataset_redirect(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Result<Redirect, ApiError> {
    let dataset = Dataset::find_by_slug(&slug, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;
    let url = dataset.url.ok_or(ApiError::NotFound)?;
    Ok(Redirect::to(&url))
}
