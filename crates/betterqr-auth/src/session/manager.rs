//! Session lifecycle manager: create, validate, revoke.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use betterqr_core::config::session::SessionConfig;
use betterqr_core::error::AppError;
use betterqr_core::logging::MAIN;
use betterqr_core::result::AppResult;
use betterqr_entity::session::Session;
use betterqr_entity::user::UserIdentity;

use super::lifetime;
use super::store::SessionStore;

/// Why a presented session id was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// No user holds the session id.
    NotFound,
    /// The session exists but has reached the maximum age.
    Expired {
        /// Owner of the stale session.
        user: UserIdentity,
    },
}

/// Outcome of validating a session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The session is live.
    Valid {
        /// Owner of the session.
        user: UserIdentity,
        /// The matched session entry.
        session: Session,
    },
    /// The session must not be honoured.
    Invalid(InvalidReason),
}

impl ValidationResult {
    /// Whether the session is live.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Outcome of revoking a session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeResult {
    /// The session moved to the revoked list.
    Revoked,
    /// No user held the session id.
    NotFound,
}

/// Manages the session lifecycle against an injected [`SessionStore`].
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    max_age: Duration,
    retention: Duration,
}

impl SessionManager {
    /// Creates a manager using the configured max age and retention window.
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            max_age: lifetime(config.max_age_seconds),
            retention: lifetime(config.revoked_retention_seconds),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Sessions at or beyond this age are rejected.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Issues a new session for `user` and appends it to their record.
    ///
    /// Nothing is persisted when the append fails.
    pub async fn create(
        &self,
        user: &UserIdentity,
        client_ip: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<Session> {
        let session = Session::issue(Utc::now(), client_ip, user_agent);

        if !self.store.append_session(user.uuid, &session).await? {
            return Err(AppError::database(format!(
                "User {} vanished before the session could be stored",
                user.uuid
            )));
        }

        info!(
            target: MAIN,
            user = %user.uuid,
            ip = session.ip.as_deref().unwrap_or("-"),
            "Session created"
        );
        Ok(session)
    }

    /// Validates `sid` against the current time. Read-only.
    pub async fn validate(&self, sid: &str) -> AppResult<ValidationResult> {
        self.validate_at(sid, Utc::now()).await
    }

    /// Validates `sid` as of `now`. Read-only.
    pub async fn validate_at(&self, sid: &str, now: DateTime<Utc>) -> AppResult<ValidationResult> {
        let Some(user) = self.store.find_user_by_session_id(sid).await? else {
            return Ok(ValidationResult::Invalid(InvalidReason::NotFound));
        };
        let Some(session) = user.session(sid).cloned() else {
            return Ok(ValidationResult::Invalid(InvalidReason::NotFound));
        };

        if session.is_expired_at(now, self.max_age) {
            return Ok(ValidationResult::Invalid(InvalidReason::Expired {
                user: user.identity(),
            }));
        }

        Ok(ValidationResult::Valid {
            user: user.identity(),
            session,
        })
    }

    /// Revokes `sid`: the matching entry moves from the active list to the
    /// revoked list in one update.
    pub async fn revoke(&self, sid: &str) -> AppResult<RevokeResult> {
        let Some(user) = self.store.find_user_by_session_id(sid).await? else {
            return Ok(RevokeResult::NotFound);
        };
        let Some(session) = user.session(sid).cloned() else {
            return Ok(RevokeResult::NotFound);
        };

        if !self.store.move_to_revoked(user.uuid, &session).await? {
            // A concurrent revoke or expiry removed it first.
            return Ok(RevokeResult::NotFound);
        }

        self.store.ensure_retention_index().await?;

        info!(target: MAIN, user = %user.uuid, "Session revoked");
        Ok(RevokeResult::Revoked)
    }

    /// Removes an expired session from the user's active list.
    pub async fn discard_expired(&self, user: &UserIdentity, sid: &str) -> AppResult<bool> {
        let removed = self.store.remove_session(user.uuid, sid).await?;
        if removed {
            info!(target: MAIN, user = %user.uuid, "Expired session discarded");
        } else {
            warn!(target: MAIN, user = %user.uuid, "Expired session already gone");
        }
        Ok(removed)
    }

    /// Revoked sessions of `user` still inside the retention window.
    pub async fn revoked_sessions(&self, user: &UserIdentity) -> AppResult<Vec<Session>> {
        let not_before = Utc::now() - self.retention;
        self.store.revoked_sessions(user.uuid, not_before).await
    }
}
