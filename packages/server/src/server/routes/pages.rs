use axum::{
    extract::{Extension, Path},
    response::Redirect,
    Json,
};
use serde_json::{json, Value};

use crate::domains::accounts::Account;
use crate::domains::catalog::forms::DataRequestForm;
use crate::domains::catalog::models::{Link, Project, Supporter};
use crate::server::app::AppState;
use crate::server::errors::ApiError;

/// Home page payload: the site settings plus the featured project, if any
pub async fn home(Extension(state): Extension<AppState>) -> Result<Json<Value>, ApiError> {
    let featured = Project::featured_project(&state.db_pool).await?;
    Ok(Json(json!({
        "site": state.site,
        "featured_project": featured,
    })))
}

pub async fn about(Extension(state): Extension<AppState>) -> Json<Value> {
    static_page(&state, "about")
}

pub async fn contact(Extension(state): Extension<AppState>) -> Json<Value> {
    static_page(&state, "contact")
}

pub async fn faq(Extension(state): Extension<AppState>) -> Json<Value> {
    static_page(&state, "faq")
}

/// Shown after a successful submission
pub async fn thanks(Extension(state): Extension<AppState>) -> Json<Value> {
    static_page(&state, "thanks")
}

fn static_page(state: &AppState, page: &str) -> Json<Value> {
    Json(json!({
        "site": state.site,
        "page": page,
    }))
}

/// The community page: the featured project and every registered member
pub async fn community(Extension(state): Extension<AppState>) -> Result<Json<Value>, ApiError> {
    let featured = Project::featured_project(&state.db_pool).await?;
    let community = Account::find_all(&state.db_pool).await?;
    Ok(Json(json!({
        "featured": featured,
        "community": community,
    })))
}

/// A member's profile page, with their links and the projects they support
pub async fn community_member(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let account = Account::find_by_username(&username, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;

    let (links, projects) =
        match Supporter::find_by_account(account.id, &state.db_pool).await? {
            Some(supporter) => (
                Link::find_for_supporter(supporter.id, &state.db_pool).await?,
                Supporter::projects(supporter.id, &state.db_pool).await?,
            ),
            None => (Vec::new(), Vec::new()),
        };

    Ok(Json(json!({
        "profile": account,
        "links": links,
        "projects": projects,
    })))
}

pub async fn request_data_page(Extension(state): Extension<AppState>) -> Json<Value> {
    static_page(&state, "request_data")
}

/// Point a visitor at a dataset the catalog does not have yet.
///
/// The request used to go out as an email to the data team; today it is
/// recorded in the logs for them to pick up.
pub async fn request_data(Json(form): Json<DataRequestForm>) -> Result<Redirect, ApiError> {
    form.validate().map_err(ApiError::Validation)?;
    tracing::info!(
        name = %form.name.trim(),
        email = %form.email.trim(),
        message = %form.message.trim(),
        "data request received"
    );
    Ok(Redirect::to("/data"))
}
