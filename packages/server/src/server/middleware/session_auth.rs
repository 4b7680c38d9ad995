use crate::common::AccountId;
use crate::server::auth::SessionStore;
use axum::{extract::{Request, State}, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Cookie used by browser clients; API clients send a bearer token instead
pub const SESSION_COOKIE: &str = "catalog_session";

/// Authenticated user information from session
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub account_id: AccountId,
    pub username: String,
}

/// Middleware to extract session and populate auth user
///
/// This middleware:
/// 1. Extracts session token from the Authorization header or session cookie
/// 2. Looks up session in SessionStore
/// 3. Stores AuthUser in request extensions
///
/// Note: This middleware does NOT block requests - it only extracts auth info.
/// Handlers that require a login check for the AuthUser extension themselves.
pub async fn session_auth_middleware(
    State(session_store): State<Arc<SessionStore>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, session_store.as_ref()).await;

    // Store auth user in request extensions
    if let Some(user) = auth_user {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

/// Extract and verify auth user from request
///
/// Returns a future that does not borrow the request: `Body` is not `Sync`,
/// so holding `&Request` across an await would make the future non-`Send`.
fn extract_auth_user<'a>(
    request: &Request,
    session_store: &'a SessionStore,
) -> impl std::future::Future<Output = Option<AuthUser>> + 'a {
    let token = bearer_token(request).or_else(|| cookie_token(request));

    async move {
        let token = token?;

        // Look up session
        let session = session_store.get_session(&token).await?;

        Some(AuthUser {
            account_id: session.account_id,
            username: session.username,
        })
    }
}

fn bearer_token(request: &Request) -> Option<String> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Remove "Bearer " prefix
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);
    Some(token.to_string())
}

fn cookie_token(request: &Request) -> Option<String> {
    let jar = CookieJar::from_headers(request.headers());
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}
