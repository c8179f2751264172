//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::WebError;
use crate::web::state::AppState;

/// Pulls the value of the named cookie out of the request headers.
pub fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            let (name, value) = c.trim().split_once('=')?;
            (name == cookie_name && !value.is_empty()).then_some(value)
        })
}

/// The 401 body for each protected path.
fn login_required_message(path: &str) -> &'static str {
    match path {
        "/submit-doubt" => "You must be logged in to submit a doubt",
        "/submit-bookasession" => "You must be logged in to book a session",
        _ => "You must be logged in to view this page",
    }
}

/// Middleware that resolves the session cookie into a `SessionIdentity`.
///
/// If valid, inserts the identity into request extensions for handlers to use.
/// If missing, unknown or expired, returns 401 Unauthorized before the body is read.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    // Owned copies: nothing borrowed from `req` may live across an await.
    let path = req.uri().path().to_owned();
    let unauthorized = || WebError::Unauthorized(login_required_message(&path).to_string());

    // 1. Extract the session token from the cookie header
    let Some(token) =
        session_token(req.headers(), &state.config.session_cookie_name).map(str::to_owned)
    else {
        debug!(%path, "Request without a session cookie");
        return Err(unauthorized());
    };

    // 2. Resolve it against the session store
    let identity = match state.sessions.get(&token).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            debug!(%path, "Unknown or expired session");
            return Err(unauthorized());
        }
        Err(e) => {
            error!("Failed to validate auth session: {:?}", e);
            return Err(unauthorized());
        }
    };

    // 3. Hand the identity to the handler
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
