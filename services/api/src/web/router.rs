//! services/api/src/web/router.rs
//!
//! Assembles the application router: public pages and auth forms, the routes
//! behind `require_auth`, and static file serving.

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, get_service, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

use crate::adapters::uploads::UPLOADS_URL_PREFIX;
use crate::web::{
    auth::{login_handler, signup_handler},
    middleware::require_auth,
    rest::{dashboard_handler, submit_bookasession_handler, submit_doubt_handler},
    state::AppState,
};

pub fn build_router(app_state: Arc<AppState>) -> Router {
    let config = app_state.config.clone();
    let page = |file: &str| get_service(ServeFile::new(config.views_dir.join(file)));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/signup", page("signup.html").post(signup_handler))
        .route("/login", page("login.html").post(login_handler))
        .route("/home", page("home.html"))
        .route("/health", get(|| async { "OK" }));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/submit-doubt", post(submit_doubt_handler))
        .route("/submit-bookasession", post(submit_bookasession_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service(
            &format!("/{UPLOADS_URL_PREFIX}"),
            ServeDir::new(&config.upload_dir),
        )
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(app_state)
}
