//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Thirty days, in seconds.
const THIRTY_DAYS: u64 = 2_592_000;

/// Upper bound for session max age and revoked-session retention (ten years).
pub const MAX_LIFETIME_SECONDS: u64 = 315_360_000;

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Sessions at or beyond this age are rejected.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
    /// How long revoked sessions are retained after their creation.
    #[serde(default = "default_max_age")]
    pub revoked_retention_seconds: u64,
    /// Interval between retention sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age_seconds: THIRTY_DAYS,
            revoked_retention_seconds: THIRTY_DAYS,
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_cookie_name() -> String {
    "sid".to_string()
}

fn default_max_age() -> u64 {
    THIRTY_DAYS
}

fn default_sweep_interval() -> u64 {
    60
}
