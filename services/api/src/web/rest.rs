//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the authenticated pages (dashboard, doubt and
//! session submissions) and the master definition for the OpenAPI specification.

use crate::error::WebError;
use crate::web::auth::{LoginForm, SignupForm};
use crate::web::state::AppState;
use crate::web::upload::DoubtSubmission;
use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Redirect},
    Extension, Form,
};
use doubtnlearn_core::domain::{
    parse_preferred_time, DashboardUser, DashboardView, NewBookedSession, NewDoubt,
    SessionIdentity,
};
use doubtnlearn_core::ports::PortError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        dashboard_handler,
        submit_doubt_handler,
        submit_bookasession_handler,
    ),
    components(
        schemas(SignupForm, LoginForm, BookSessionForm)
    ),
    tags(
        (name = "DoubtNLearn", description = "Doubt submission and mentoring session booking.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Form Payloads
//=========================================================================================

/// The "book a session" form.
#[derive(Deserialize, ToSchema)]
pub struct BookSessionForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    /// RFC 3339, `datetime-local` (`2025-06-01T10:00`) or a bare date.
    #[serde(default)]
    pub preferred_time: String,
    #[serde(default)]
    pub message: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Show the logged-in user's doubts and booked sessions.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Rendered dashboard page", body = String, content_type = "text/html"),
        (status = 401, description = "No valid session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
) -> Result<impl IntoResponse, WebError> {
    let failed = |e: PortError| {
        error!("Failed to load dashboard for {}: {:?}", identity.user_id, e);
        WebError::Internal("Error fetching dashboard data".to_string())
    };

    let user = state
        .db
        .find_user_by_id(identity.user_id)
        .await
        .map_err(failed)?
        .ok_or_else(|| {
            error!("Session refers to missing user {}", identity.user_id);
            WebError::Internal("Error fetching dashboard data".to_string())
        })?;
    let doubts = state
        .db
        .find_doubts_by_user(identity.user_id)
        .await
        .map_err(failed)?;
    let bookasessions = state
        .db
        .find_booked_sessions_by_user(identity.user_id)
        .await
        .map_err(failed)?;

    let view = DashboardView {
        user: DashboardUser {
            name: user.name,
            email: user.email,
        },
        doubts,
        bookasessions,
    };
    Ok(Html(state.renderer.render_dashboard(&view)))
}

/// Submit a new doubt, optionally with one image.
///
/// Accepts a multipart/form-data request with a `doubt` text field and an
/// optional `image` file field, or a urlencoded form with the text only.
#[utoipa::path(
    post,
    path = "/submit-doubt",
    request_body(content_type = "multipart/form-data", description = "`doubt` text and optional `image` file."),
    responses(
        (status = 303, description = "Doubt stored; redirects to /dashboard"),
        (status = 400, description = "Malformed body or unexpected file field"),
        (status = 401, description = "No valid session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_doubt_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    submission: DoubtSubmission,
) -> Result<impl IntoResponse, WebError> {
    const FAILED: &str = "Error submitting doubt";

    let image_path = match &submission.image {
        Some(file) => Some(
            state
                .uploads
                .save(&file.original_name, &file.data)
                .await
                .map_err(|e| {
                    error!("Failed to store doubt image: {:?}", e);
                    WebError::Internal(FAILED.to_string())
                })?,
        ),
        None => None,
    };

    let doubt = state
        .db
        .insert_doubt(NewDoubt {
            user_id: identity.user_id,
            doubt_text: submission.doubt_text,
            image_path,
        })
        .await
        .map_err(|e| {
            error!("Failed to save doubt: {:?}", e);
            WebError::Internal(FAILED.to_string())
        })?;

    info!(user_id = %identity.user_id, doubt_id = %doubt.id, with_image = doubt.image_path.is_some(), "Doubt submitted");
    Ok(Redirect::to("/dashboard"))
}

const BOOKING_FAILED: &str = "Error booking your session. Sorry for the inconvenience.";

/// Book a mentoring session.
#[utoipa::path(
    post,
    path = "/submit-bookasession",
    request_body(content = BookSessionForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Session booked; redirects to /dashboard"),
        (status = 400, description = "Invalid preferred time or missing email"),
        (status = 401, description = "No valid session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_bookasession_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<SessionIdentity>,
    form: Result<Form<BookSessionForm>, FormRejection>,
) -> Result<impl IntoResponse, WebError> {
    let Form(form) = form.map_err(|r| WebError::rejected_form(r, BOOKING_FAILED))?;
    let preferred_time = parse_preferred_time(&form.preferred_time).ok_or_else(|| {
        WebError::Validation("Invalid date format for preferred time".to_string())
    })?;
    if form.email.trim().is_empty() {
        return Err(WebError::Validation("Email is required".to_string()));
    }

    let booked = state
        .db
        .insert_booked_session(NewBookedSession {
            user_id: identity.user_id,
            name: form.name,
            email: form.email,
            phone: form.phone,
            subject: form.subject,
            preferred_time,
            message: form.message,
        })
        .await
        .map_err(|e| {
            error!("Failed to book session: {:?}", e);
            WebError::Internal(BOOKING_FAILED.to_string())
        })?;

    info!(user_id = %identity.user_id, booking_id = %booked.id, "Session booked");
    Ok(Redirect::to("/dashboard"))
}
