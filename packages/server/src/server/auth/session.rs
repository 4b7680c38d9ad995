use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::common::AccountId;

/// Session token (random UUID)
pub type SessionToken = String;

/// Session data stored after a successful login
#[derive(Clone, Debug)]
pub struct Session {
    pub account_id: AccountId,
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// In-memory session store
///
/// Sessions expire after the configured number of hours
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
    ttl_hours: i64,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl_hours,
        }
    }

    /// Create a new session and return the token
    pub async fn create_session(&self, session: Session) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);
        token
    }

    /// Get session by token, unless it has expired
    pub async fn get_session(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;

        let now = chrono::Utc::now();
        let elapsed = now.signed_duration_since(session.created_at);
        if elapsed.num_hours() >= self.ttl_hours {
            // Session expired
            return None;
        }

        Some(session.clone())
    }

    /// Delete session (logout)
    pub async fn delete_session(&self, token: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
        Ok(())
    }

    /// Clean up expired sessions (run periodically)
    pub async fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write().await;
        let now = chrono::Utc::now();

        sessions.retain(|_, session| {
            let elapsed = now.signed_duration_since(session.created_at);
            elapsed.num_hours() < self.ttl_hours
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_created_at(created_at: chrono::DateTime<chrono::Utc>) -> Session {
        Session {
            account_id: AccountId::new(),
            username: "foo".to_string(),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_session_creation() {
        let store = SessionStore::new(24);
        let session = session_created_at(chrono::Utc::now());

        let token = store.create_session(session.clone()).await;
        assert!(!token.is_empty());

        let retrieved = store.get_session(&token).await;
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().username, session.username);
    }

    #[tokio::test]
    async fn test_session_expiration() {
        let store = SessionStore::new(24);
        let session = session_created_at(chrono::Utc::now() - chrono::Duration::hours(25));

        let token = store.create_session(session).await;
        let retrieved = store.get_session(&token).await;
        assert!(retrieved.is_none(), "Expired session should return None");
    }

    #[tokio::test]
    async fn test_deleted_session_is_gone() {
        let store = SessionStore::new(24);
        let token = store.create_session(session_created_at(chrono::Utc::now())).await;

        store.delete_session(&token).await.unwrap();
        assert!(store.get_session(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_cleanup_drops_only_expired_sessions() {
        let store = SessionStore::new(24);
        let stale = store
            .create_session(session_created_at(chrono::Utc::now() - chrono::Duration::hours(30)))
            .await;
        let fresh = store.create_session(session_created_at(chrono::Utc::now())).await;

        store.cleanup_expired().await;

        assert!(store.get_session(&stale).await.is_none());
        assert!(store.get_session(&fresh).await.is_some());
    }
}
