use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::{json, Value};

use crate::domains::accounts::Account;
use crate::domains::catalog::forms::{LoginForm, RegisterForm};
use crate::server::app::AppState;
use crate::server::auth::Session;
use crate::server::errors::{conflict_on_unique, ApiError};
use crate::server::middleware::SESSION_COOKIE;

/// Create an account and sign it straight in
pub async fn register(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, CookieJar, Json<Value>), ApiError> {
    form.validate().map_err(ApiError::Validation)?;

    let account = Account::register(
        form.username.trim(),
        form.email.trim(),
        &form.password,
        &state.db_pool,
    )
    .await
    .map_err(|err| conflict_on_unique(err, "That username is taken."))?;

    let token = start_session(&state, &account).await;
    let jar = jar.add(session_cookie(&token));

    tracing::info!(username = %account.username, "account registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(json!({ "token": token, "account": account })),
    ))
}

/// Log in, passing back the page the visitor was headed for
pub async fn login(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    form.validate().map_err(ApiError::Validation)?;

    let account = Account::find_by_username(form.username.trim(), &state.db_pool)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;
    if !account.verify_password(&form.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = start_session(&state, &account).await;
    let jar = jar.add(session_cookie(&token));
    let next = form.next.unwrap_or_else(|| "/".to_string());

    tracing::info!(username = %account.username, "logged in");
    Ok((
        jar,
        Json(json!({ "token": token, "account": account, "next": next })),
    ))
}

/// Drop the session. Safe to call when already logged out.
pub async fn logout(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    if let Some(token) = request_token(&headers, &jar) {
        state.sessions.delete_session(&token).await?;
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    Ok((jar.remove(removal), Json(json!({ "success": true }))))
}

async fn start_session(state: &AppState, account: &Account) -> String {
    state
        .sessions
        .create_session(Session {
            account_id: account.id,
            username: account.username.clone(),
            created_at: chrono::Utc::now(),
        })
        .await
}

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .build()
}

fn request_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).to_string());
    bearer.or_else(|| jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()))
}
