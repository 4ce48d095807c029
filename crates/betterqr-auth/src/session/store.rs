//! The session persistence boundary and its PostgreSQL implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

use betterqr_core::logging::DB;
use betterqr_core::result::AppResult;
use betterqr_database::repositories::{SessionRepository, UserRepository};
use betterqr_entity::session::Session;
use betterqr_entity::user::User;

/// Persistence operations over users and their embedded sessions.
///
/// Every mutation touches exactly one user record and is atomic with respect
/// to concurrent mutations of the same record.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Look up a user by email, case-insensitively.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Look up the user whose active sessions contain `sid`.
    async fn find_user_by_session_id(&self, sid: &str) -> AppResult<Option<User>>;

    /// Append `session` to the user's active sessions.
    ///
    /// Returns `false` when the user does not exist.
    async fn append_session(&self, user: Uuid, session: &Session) -> AppResult<bool>;

    /// Remove the active session `sid`. Returns `false` when it was absent.
    async fn remove_session(&self, user: Uuid, sid: &str) -> AppResult<bool>;

    /// Move `session` from the active list to the revoked list in one update.
    ///
    /// Returns `false` when the session was no longer active.
    async fn move_to_revoked(&self, user: Uuid, session: &Session) -> AppResult<bool>;

    /// Make sure the structure backing revoked-session retention exists.
    /// Idempotent.
    async fn ensure_retention_index(&self) -> AppResult<()>;

    /// Revoked sessions of `user` created at or after `not_before`, oldest first.
    async fn revoked_sessions(
        &self,
        user: Uuid,
        not_before: DateTime<Utc>,
    ) -> AppResult<Vec<Session>>;

    /// Drop every revoked session created before `cutoff`.
    ///
    /// Returns the number of user records that changed.
    async fn purge_revoked_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// [`SessionStore`] backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    users: UserRepository,
    sessions: SessionRepository,
}

impl PgSessionStore {
    /// Creates a store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool),
        }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.find_by_email(email).await.inspect_err(|e| {
            error!(target: DB, error = %e, "User lookup by email failed");
        })
    }

    async fn find_user_by_session_id(&self, sid: &str) -> AppResult<Option<User>> {
        self.sessions.find_user_by_sid(sid).await.inspect_err(|e| {
            error!(target: DB, error = %e, "User lookup by session failed");
        })
    }

    async fn append_session(&self, user: Uuid, session: &Session) -> AppResult<bool> {
        let appended = self.sessions.push_session(user, session).await?;
        debug!(target: DB, user = %user, appended, "Session appended");
        Ok(appended)
    }

    async fn remove_session(&self, user: Uuid, sid: &str) -> AppResult<bool> {
        let removed = self.sessions.pull_session(user, sid).await?;
        debug!(target: DB, user = %user, removed, "Session removed");
        Ok(removed)
    }

    async fn move_to_revoked(&self, user: Uuid, session: &Session) -> AppResult<bool> {
        let moved = self.sessions.move_to_revoked(user, session).await?;
        debug!(target: DB, user = %user, moved, "Session moved to revoked");
        Ok(moved)
    }

    async fn ensure_retention_index(&self) -> AppResult<()> {
        self.sessions.ensure_retention_index().await
    }

    async fn revoked_sessions(
        &self,
        user: Uuid,
        not_before: DateTime<Utc>,
    ) -> AppResult<Vec<Session>> {
        self.sessions.list_revoked(user, not_before).await
    }

    async fn purge_revoked_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        self.sessions.purge_revoked_before(cutoff).await
    }
}
