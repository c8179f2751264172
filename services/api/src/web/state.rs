//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use doubtnlearn_core::ports::{
    CredentialHasher, DashboardRenderer, DatabaseService, SessionStore, UploadStore,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub sessions: Arc<dyn SessionStore>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub uploads: Arc<dyn UploadStore>,
    pub renderer: Arc<dyn DashboardRenderer>,
    pub config: Arc<Config>,
}

impl AppState {
    /// The `Set-Cookie` value for a freshly created login session.
    pub fn session_cookie(&self, token: &str) -> String {
        format!(
            "{}={}; HttpOnly;{} SameSite=Lax; Path=/; Max-Age={}",
            self.config.session_cookie_name,
            token,
            if self.config.cookie_secure { " Secure;" } else { "" },
            self.config.session_ttl_secs
        )
    }
}
