//! In-memory session store using a Tokio mutex, for tests and single-node
//! development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use betterqr_core::result::AppResult;
use betterqr_entity::session::Session;
use betterqr_entity::user::User;

use super::store::SessionStore;

/// Users keyed by uuid, guarded by one mutex so each operation is atomic.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    retention_index: Arc<Mutex<bool>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user record.
    pub async fn insert_user(&self, user: User) {
        self.users.lock().await.insert(user.uuid, user);
    }

    /// A snapshot of the stored user.
    pub async fn user(&self, uuid: Uuid) -> Option<User> {
        self.users.lock().await.get(&uuid).cloned()
    }

    /// Whether [`SessionStore::ensure_retention_index`] has run.
    pub async fn has_retention_index(&self) -> bool {
        *self.retention_index.lock().await
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_session_id(&self, sid: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|u| u.sessions.iter().any(|s| s.sid == sid))
            .cloned())
    }

    async fn append_session(&self, user: Uuid, session: &Session) -> AppResult<bool> {
        let mut users = self.users.lock().await;
        match users.get_mut(&user) {
            Some(u) => {
                u.sessions.push(session.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_session(&self, user: Uuid, sid: &str) -> AppResult<bool> {
        let mut users = self.users.lock().await;
        let Some(u) = users.get_mut(&user) else {
            return Ok(false);
        };
        let before = u.sessions.len();
        u.sessions.retain(|s| s.sid != sid);
        Ok(u.sessions.len() != before)
    }

    async fn move_to_revoked(&self, user: Uuid, session: &Session) -> AppResult<bool> {
        let mut users = self.users.lock().await;
        let Some(u) = users.get_mut(&user) else {
            return Ok(false);
        };
        let Some(pos) = u.sessions.iter().position(|s| s.sid == session.sid) else {
            return Ok(false);
        };
        let moved = u.sessions.remove(pos);
        u.logged_out_sessions.push(moved);
        Ok(true)
    }

    async fn ensure_retention_index(&self) -> AppResult<()> {
        *self.retention_index.lock().await = true;
        Ok(())
    }

    async fn revoked_sessions(
        &self,
        user: Uuid,
        not_before: DateTime<Utc>,
    ) -> AppResult<Vec<Session>> {
        let users = self.users.lock().await;
        Ok(users
            .get(&user)
            .map(|u| {
                u.logged_out_sessions
                    .iter()
                    .filter(|s| s.created_at >= not_before)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn purge_revoked_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut users = self.users.lock().await;
        let mut changed = 0;
        for u in users.values_mut() {
            let before = u.logged_out_sessions.len();
            u.logged_out_sessions.retain(|s| s.created_at >= cutoff);
            if u.logged_out_sessions.len() != before {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
