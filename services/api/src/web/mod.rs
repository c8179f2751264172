pub mod auth;
pub mod middleware;
pub mod rest;
pub mod router;
pub mod state;
pub mod upload;

// Re-export the router builder and handlers so the binaries can reach them
// without spelling out every module.
pub use auth::{login_handler, signup_handler};
pub use middleware::require_auth;
pub use rest::{dashboard_handler, submit_bookasession_handler, submit_doubt_handler};
pub use router::build_router;
