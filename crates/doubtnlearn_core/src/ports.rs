//! crates/doubtnlearn_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or file storage.

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{
    BookedSession, DashboardView, Doubt, NewBookedSession, NewDoubt, NewUser, SessionIdentity,
    User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, filesystem).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The document store holding users, doubts and booked sessions.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Users ---
    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<User>>;

    async fn find_user_by_id(&self, user_id: Uuid) -> PortResult<Option<User>>;

    /// Fails with `PortError::DuplicateKey` when the email is already taken.
    async fn insert_user(&self, user: NewUser) -> PortResult<User>;

    // --- Doubts ---
    async fn insert_doubt(&self, doubt: NewDoubt) -> PortResult<Doubt>;

    async fn find_doubts_by_user(&self, user_id: Uuid) -> PortResult<Vec<Doubt>>;

    // --- Booked Sessions ---
    async fn insert_booked_session(&self, session: NewBookedSession) -> PortResult<BookedSession>;

    async fn find_booked_sessions_by_user(&self, user_id: Uuid) -> PortResult<Vec<BookedSession>>;
}

/// Server-side store of browser login sessions, keyed by an opaque cookie token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session and returns its token.
    async fn create(&self, user_id: Uuid, name: &str) -> PortResult<String>;

    /// Resolves a token; unknown and expired tokens yield `None`.
    async fn get(&self, token: &str) -> PortResult<Option<SessionIdentity>>;

    /// Drops every expired session and returns how many were removed.
    async fn purge_expired(&self) -> PortResult<usize>;
}

#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// One-way, salted hash of a password.
    async fn hash(&self, plaintext: &str) -> PortResult<String>;

    /// Checks a password against a stored hash. Internal failures read as a mismatch.
    async fn verify(&self, plaintext: &str, hashed: &str) -> bool;
}

#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Persists an uploaded file and returns a path reference for later retrieval.
    async fn save(&self, original_name: &str, data: &[u8]) -> PortResult<String>;
}

pub trait DashboardRenderer: Send + Sync {
    fn render_dashboard(&self, view: &DashboardView) -> String;
}
