//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup and login.

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect},
    Form,
};
use doubtnlearn_core::domain::{normalize_email, AccountType, NewUser};
use doubtnlearn_core::ports::PortError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::error::WebError;
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

/// The signup form as posted by `signup.html`.
#[derive(Deserialize, ToSchema)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    pub email: String,
    /// Empty when the user left the field blank.
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
    #[serde(default)]
    pub domain: String,
    /// One of `Student`, `Mentor` or `Faculty`.
    #[serde(rename = "accountType", default)]
    pub account_type: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn parse_age(raw: &str) -> Result<Option<i32>, WebError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>()
        .ok()
        .filter(|age| *age >= 0)
        .map(Some)
        .ok_or_else(|| WebError::Validation("Age must be a whole number".to_string()))
}

//=========================================================================================
// Handlers
//=========================================================================================

const SIGNUP_FAILED: &str = "Error signing up";
const LOGIN_FAILED: &str = "Login failed";
const DUPLICATE_EMAIL: &str = "Email already exists. Please use a different one.";

/// POST /signup - Create a new user account
#[utoipa::path(
    post,
    path = "/signup",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "User created successfully", body = String),
        (status = 400, description = "Email already taken, invalid form field or unreadable form body"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SignupForm>, FormRejection>,
) -> Result<impl IntoResponse, WebError> {
    // 1. Validate the typed fields
    let Form(form) = form.map_err(|r| WebError::rejected_form(r, SIGNUP_FAILED))?;
    if form.email.trim().is_empty() {
        return Err(WebError::Validation("Email is required".to_string()));
    }
    let age = parse_age(&form.age)?;
    let account_type = form
        .account_type
        .parse::<AccountType>()
        .map_err(|e| WebError::Validation(e.to_string()))?;

    // 2. Reject emails that are already registered
    let existing = state.db.find_user_by_email(&form.email).await.map_err(|e| {
        error!("Failed to look up user during signup: {:?}", e);
        WebError::Internal(SIGNUP_FAILED.to_string())
    })?;
    if existing.is_some() {
        warn!("Signup rejected: email already registered");
        return Err(WebError::Conflict(DUPLICATE_EMAIL.to_string()));
    }

    // 3. Hash the password
    let password_hash = state
        .hasher
        .hash(&form.password)
        .await
        .map_err(|_| WebError::Internal(SIGNUP_FAILED.to_string()))?;

    // 4. Create user in database; the store enforces uniqueness for racing signups
    let user = state
        .db
        .insert_user(NewUser {
            name: form.name,
            email: form.email,
            age,
            phone: form.phone,
            password_hash,
            domain: form.domain,
            account_type,
        })
        .await
        .map_err(|e| match e {
            PortError::DuplicateKey(_) => WebError::Conflict(DUPLICATE_EMAIL.to_string()),
            other => {
                error!("Failed to create user: {:?}", other);
                WebError::Internal(SIGNUP_FAILED.to_string())
            }
        })?;

    info!(user_id = %user.id, account_type = %user.account_type, "User registered");
    Ok((StatusCode::OK, "User registered successfully"))
}

/// POST /login - Login with an existing account
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Login successful; sets the session cookie and redirects to /dashboard"),
        (status = 400, description = "Incorrect password or unreadable form body"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<impl IntoResponse, WebError> {
    let Form(form) = form.map_err(|r| WebError::rejected_form(r, LOGIN_FAILED))?;

    // 1. Get user by normalized email
    let email = normalize_email(&form.email);
    let user = state
        .db
        .find_user_by_email(&email)
        .await
        .map_err(|e| {
            error!("Failed to get user: {:?}", e);
            WebError::Internal(LOGIN_FAILED.to_string())
        })?
        .ok_or_else(|| WebError::NotFound("User not found".to_string()))?;

    // 2. Verify password
    if !state.hasher.verify(&form.password, &user.password_hash).await {
        warn!(user_id = %user.id, "Login rejected: incorrect password");
        return Err(WebError::InvalidCredentials("Incorrect password".to_string()));
    }

    // 3. Create the login session
    let token = state.sessions.create(user.id, &user.name).await.map_err(|e| {
        error!("Failed to create auth session: {:?}", e);
        WebError::Internal(LOGIN_FAILED.to_string())
    })?;

    // 4. Set the cookie and send the browser to its dashboard
    info!(user_id = %user.id, "User logged in");
    Ok((
        [(header::SET_COOKIE, state.session_cookie(&token))],
        Redirect::to("/dashboard"),
    ))
}
