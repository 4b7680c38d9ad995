use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::catalog::search::find_resources;
use crate::server::app::AppState;
use crate::server::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// The search bar.
///
/// An empty query is answered with nulls rather than empty buckets, so the
/// front end can tell "no query" apart from "query matched nothing".
pub async fn search(
    Extension(state): Extension<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let query = params.q.as_deref().map(str::trim).unwrap_or("");
    if query.is_empty() {
        return Ok(Json(json!({ "query": null, "results": null })));
    }

    let results = find_resources(state.store.as_ref(), query).await?;
    Ok(Json(json!({ "query": query, "results": results })))
}

/// Tag-name completion for the search bar
pub async fn autocomplete(
    Extension(state): Extension<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let query = params.q.as_deref().map(str::trim).unwrap_or("");
    if query.is_empty() {
        return Ok(Json(json!({ "tags": null })));
    }

    let tags = state.store.find_tags_matching(query).await?;
    let names: Vec<String> = tags.into_iter().map(|tag| tag.name).collect();
    Ok(Json(json!({ "tags": names })))
}
