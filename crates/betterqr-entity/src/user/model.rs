//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::session::Session;

/// A registered account together with its login sessions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Stable account identifier.
    pub uuid: Uuid,
    /// Login email, unique case-insensitively.
    pub email: String,
    /// Display name given at signup.
    pub name: Option<String>,
    /// Credential material.
    #[serde(skip_serializing)]
    #[sqlx(json)]
    pub security: Security,
    /// Active sessions, oldest first.
    #[sqlx(json)]
    pub sessions: Vec<Session>,
    /// Revoked sessions awaiting retention expiry, oldest first.
    #[sqlx(json)]
    pub logged_out_sessions: Vec<Session>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The active session with id `sid`, if any.
    pub fn session(&self, sid: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.sid == sid)
    }

    /// The identity carried through the request once a session is validated.
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::from(self)
    }
}

/// Credential sub-document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    /// Argon2 PHC hash string.
    pub password: String,
}

/// The parts of a user that are safe to attach to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub uuid: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl From<&User> for UserIdentity {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.uuid,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
