//! Session registry — opaque per-session user identifiers.
//!
//! The id namespaces every persisted conversation key. It is minted lazily on
//! the first request carrying an unknown session token and never regenerated
//! while the session is live.

use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a session token to its user id, minting one if needed.
    /// Idempotent: the same token always maps to the same id.
    pub async fn resolve(&self, session_token: &str) -> String {
        if let Some(user_id) = self.sessions.read().await.get(session_token) {
            return user_id.clone();
        }
        let mut sessions = self.sessions.write().await;
        // Another task may have minted the id between the read and the write.
        sessions
            .entry(session_token.to_string())
            .or_insert_with(|| {
                let user_id = Uuid::new_v4().simple().to_string();
                tracing::debug!(user_id = %user_id, "minted user id for new session");
                user_id
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let registry = SessionRegistry::new();
        let first = registry.resolve("session-a").await;
        let second = registry.resolve("session-a").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_distinct_sessions_get_distinct_ids() {
        let registry = SessionRegistry::new();
        let a = registry.resolve("session-a").await;
        let b = registry.resolve("session-b").await;
        assert_ne!(a, b);
    }
}
