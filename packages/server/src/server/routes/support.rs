use axum::{
    extract::{Extension, Path},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{json, Value};

use crate::domains::catalog::forms::SupportForm;
use crate::domains::catalog::models::{Project, Supporter};
use crate::server::app::AppState;
use crate::server::errors::ApiError;
use crate::server::middleware::AuthUser;

/// General information on supporting a project
pub async fn support_info(Extension(state): Extension<AppState>) -> Json<Value> {
    Json(json!({
        "site": state.site,
        "page": "support",
    }))
}

/// Browsers that GET the per-project support URL are walked back to the
/// info page
pub async fn support_redirect() -> Redirect {
    Redirect::to("/support/")
}

/// Sign the current member up as a supporter of the project.
///
/// The front end posts this from the project page, so the success answer
/// depends on how it asked: an AJAX post gets JSON back, a plain form post
/// gets sent to the project page it came from.
pub async fn support_project(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    form: Option<Json<SupportForm>>,
) -> Result<Response, ApiError> {
    let user = match user {
        Some(Extension(user)) => user,
        None => return Err(ApiError::login_required(format!("/project/{slug}"))),
    };

    // A missing or malformed body counts as an invalid form
    let valid = form
        .map(|Json(form)| form.validate().is_ok())
        .unwrap_or(false);
    if !valid {
        return Ok(Redirect::to("/support/").into_response());
    }

    let project = Project::find_by_slug(&slug, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound)?;
    Supporter::add_project(user.account_id, project.id, &state.db_pool).await?;
    tracing::info!(project = %project.slug, username = %user.username, "project supported");

    if is_ajax(&headers) {
        Ok(Json(json!({ "success": true })).into_response())
    } else {
        Ok(Redirect::to(&format!("/project/{}", project.slug)).into_response())
    }
}

fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == "XMLHttpRequest")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ajax_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_ajax(&headers));

        headers.insert("x-requested-with", "XMLHttpRequest".parse().unwrap());
        assert!(is_ajax(&headers));
    }
}
