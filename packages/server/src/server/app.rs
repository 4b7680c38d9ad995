//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::{CatalogStore, PgCatalogStore};
use crate::server::auth::SessionStore;
use crate::server::middleware::session_auth_middleware;
use crate::server::routes::{
    about, app_detail, apps, autocomplete, community, community_member, contact, data,
    dataset_redirect, edit_app, edit_app_page, edit_dataset, edit_dataset_page, edit_landing,
    edit_project, edit_project_page, faq, health_handler, home, login, logout, my_projects,
    project_detail, projects, register, request_data, request_data_page, search, submit_app,
    submit_app_page, submit_dataset, submit_dataset_page, submit_project, submit_project_page,
    support_info, support_project, support_redirect, thanks,
};
use crate::server::static_files::send_text_file;

/// Site identity included in page payloads
#[derive(Clone, Serialize)]
pub struct SiteSettings {
    pub city_name: String,
    pub catalog_url: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub store: Arc<dyn CatalogStore>,
    pub sessions: Arc<SessionStore>,
    pub site: SiteSettings,
    pub page_size: usize,
}

/// Build the Axum application router
pub fn build_app(pool: PgPool, config: &Config) -> Result<Router> {
    let sessions = Arc::new(SessionStore::new(config.session_ttl_hours));
    let store: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(pool.clone()));

    // Create shared app state
    let app_state = AppState {
        db_pool: pool,
        store,
        sessions: sessions.clone(),
        site: SiteSettings {
            city_name: config.city_name.clone(),
            catalog_url: config.catalog_url.clone(),
        },
        page_size: config.page_size,
    };

    // CORS configuration - the configured front ends, or any origin for
    // development when none are set
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid allowed origin: {origin}"))
            })
            .collect::<Result<Vec<_>>>()?;
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
    };

    // Build router
    let app = Router::new()
        .route("/", get(home))
        .route("/health", get(health_handler))
        // Static pages
        .route("/about", get(about))
        .route("/contact", get(contact))
        .route("/faq", get(faq))
        .route("/thanks", get(thanks))
        // Listings
        .route("/apps", get(apps))
        .route("/data", get(data))
        .route("/projects", get(projects))
        // Search
        .route("/search", get(search))
        .route("/autocomplete", get(autocomplete))
        // Individual resources
        .route("/app/:slug", get(app_detail))
        .route("/data/:slug", get(dataset_redirect))
        .route("/project/:slug", get(project_detail))
        // Community
        .route("/community", get(community))
        .route("/community/:username", get(community_member))
        // Submission and editing
        .route("/submit/app", get(submit_app_page).post(submit_app))
        .route("/submit/data", get(submit_dataset_page).post(submit_dataset))
        .route("/submit/project", get(submit_project_page).post(submit_project))
        .route("/edit/app", get(edit_landing))
        .route("/edit/data", get(edit_landing))
        .route("/edit/project", get(edit_landing))
        .route("/edit/app/:slug", get(edit_app_page).post(edit_app))
        .route("/edit/data/:slug", get(edit_dataset_page).post(edit_dataset))
        .route("/edit/project/:slug", get(edit_project_page).post(edit_project))
        .route("/my/projects", get(my_projects))
        // Project support
        .route("/support", get(support_info))
        .route("/support/", get(support_info))
        .route("/support/:slug", get(support_redirect).post(support_project))
        // Data requests
        .route("/request/data", get(request_data_page).post(request_data))
        // Accounts
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        // Root-level text files; static routes above win over this one
        .route("/:filename", get(send_text_file))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn_with_state(
            sessions,
            session_auth_middleware,
        ))
        .layer(Extension(app_state)) // Add shared state (must be after middlewares that need it)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
