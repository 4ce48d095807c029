//! Session lifecycle: persistence boundary, validation, revocation, and
//! retention of revoked sessions.

pub mod manager;
pub mod memory;
pub mod retention;
pub mod store;

pub use manager::{InvalidReason, RevokeResult, SessionManager, ValidationResult};
pub use memory::MemorySessionStore;
pub use retention::RetentionSweeper;
pub use store::{PgSessionStore, SessionStore};

use betterqr_core::config::session::MAX_LIFETIME_SECONDS;

/// Converts a configured lifetime to a duration, capped at
/// [`MAX_LIFETIME_SECONDS`] so date arithmetic cannot overflow.
pub(crate) fn lifetime(seconds: u64) -> chrono::Duration {
    chrono::Duration::seconds(seconds.min(MAX_LIFETIME_SECONDS) as i64)
}
