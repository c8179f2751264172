//! services/api/src/adapters/memory_db.rs
//!
//! An in-process implementation of the `DatabaseService` port. Used when
//! `DATABASE_URL` starts with `memory://` and by the test suite.

use async_trait::async_trait;
use chrono::Utc;
use doubtnlearn_core::domain::{
    BookedSession, Doubt, NewBookedSession, NewDoubt, NewUser, User,
};
use doubtnlearn_core::ports::{DatabaseService, PortError, PortResult};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryDb {
    users: RwLock<Vec<User>>,
    doubts: RwLock<Vec<Doubt>>,
    booked_sessions: RwLock<Vec<BookedSession>>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> PortResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> PortResult<User> {
        // The write lock spans the uniqueness check and the insert.
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(PortError::DuplicateKey(format!("email {}", user.email)));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            age: user.age,
            phone: user.phone,
            password_hash: user.password_hash,
            domain: user.domain,
            account_type: user.account_type,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn insert_doubt(&self, doubt: NewDoubt) -> PortResult<Doubt> {
        let doubt = Doubt {
            id: Uuid::new_v4(),
            user_id: doubt.user_id,
            doubt_text: doubt.doubt_text,
            image_path: doubt.image_path,
            created_at: Utc::now(),
        };
        self.doubts.write().await.push(doubt.clone());
        Ok(doubt)
    }

    async fn find_doubts_by_user(&self, user_id: Uuid) -> PortResult<Vec<Doubt>> {
        let doubts = self.doubts.read().await;
        Ok(doubts.iter().filter(|d| d.user_id == user_id).cloned().collect())
    }

    async fn insert_booked_session(&self, session: NewBookedSession) -> PortResult<BookedSession> {
        let session = BookedSession {
            id: Uuid::new_v4(),
            user_id: session.user_id,
            name: session.name,
            email: session.email,
            phone: session.phone,
            subject: session.subject,
            preferred_time: session.preferred_time,
            message: session.message,
        };
        self.booked_sessions.write().await.push(session.clone());
        Ok(session)
    }

    async fn find_booked_sessions_by_user(&self, user_id: Uuid) -> PortResult<Vec<BookedSession>> {
        let sessions = self.booked_sessions.read().await;
        Ok(sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }
}
