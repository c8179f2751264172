//! services/api/src/adapters/sessions.rs
//!
//! In-memory implementation of the `SessionStore` port. Each session lives for a
//! fixed wall-clock TTL from the moment it is created.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use doubtnlearn_core::domain::{AuthSession, SessionIdentity};
use doubtnlearn_core::ports::{PortResult, SessionStore};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub struct InMemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, AuthSession>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user_id: Uuid, name: &str) -> PortResult<String> {
        let token = Uuid::new_v4().to_string();
        let session = AuthSession {
            token: token.clone(),
            user_id,
            name: name.to_string(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);
        debug!(%user_id, "Created login session");
        Ok(token)
    }

    async fn get(&self, token: &str) -> PortResult<Option<SessionIdentity>> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return Ok(None),
                Some(session) if !session.is_expired_at(now) => {
                    return Ok(Some(session.identity()))
                }
                Some(_) => {}
            }
        }

        // Expired: evict it so the map does not wait for the next purge.
        let mut sessions = self.sessions.write().await;
        if sessions.get(token).is_some_and(|s| s.is_expired_at(now)) {
            sessions.remove(token);
        }
        Ok(None)
    }

    async fn purge_expired(&self) -> PortResult<usize> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_token_resolves_to_identity() {
        let store = InMemorySessionStore::new(Duration::hours(1));
        let user_id = Uuid::new_v4();
        let token = store.create(user_id, "Asha").await.unwrap();

        let identity = store.get(&token).await.unwrap().unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.name, "Asha");
    }

    #[tokio::test]
    async fn tokens_are_unique_per_login() {
        let store = InMemorySessionStore::new(Duration::hours(1));
        let user_id = Uuid::new_v4();
        let first = store.create(user_id, "Asha").await.unwrap();
        let second = store.create(user_id, "Asha").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn unknown_token_is_absent() {
        let store = InMemorySessionStore::new(Duration::hours(1));
        assert!(store.get("no-such-token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_session_is_absent_and_evicted() {
        let store = InMemorySessionStore::new(Duration::zero());
        let token = store.create(Uuid::new_v4(), "Asha").await.unwrap();

        assert!(store.get(&token).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn purge_removes_only_expired_sessions() {
        let expired = InMemorySessionStore::new(Duration::zero());
        expired.create(Uuid::new_v4(), "a").await.unwrap();
        expired.create(Uuid::new_v4(), "b").await.unwrap();
        assert_eq!(expired.purge_expired().await.unwrap(), 2);
        assert!(expired.is_empty().await);

        let live = InMemorySessionStore::new(Duration::hours(1));
        live.create(Uuid::new_v4(), "c").await.unwrap();
        assert_eq!(live.purge_expired().await.unwrap(), 0);
        assert_eq!(live.len().await, 1);
    }
}
