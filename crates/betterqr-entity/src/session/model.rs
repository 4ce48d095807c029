//! Session sub-record model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One login of a user, stored inside the user record.
///
/// The provenance fields are written once at login and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unguessable session identifier (UUIDv4 text form).
    pub sid: String,
    /// When the session was issued.
    pub created_at: DateTime<Utc>,
    /// Client address at login, if known.
    pub ip: Option<String>,
    /// `User-Agent` header at login, if sent.
    pub user_agent: Option<String>,
}

impl Session {
    /// Issue a fresh session with a random id, created at `now`.
    pub fn issue(now: DateTime<Utc>, ip: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            sid: Uuid::new_v4().to_string(),
            created_at: now,
            ip,
            user_agent,
        }
    }

    /// Age of the session at `now`. Never negative.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).max(Duration::zero())
    }

    /// Whether the session has reached `max_age` at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.age_at(now) >= max_age
    }
}
