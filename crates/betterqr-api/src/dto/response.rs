//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub message: String,
}

impl LoginResponse {
    /// The fixed success body.
    pub fn success() -> Self {
        Self {
            ok: true,
            message: "Logged in successfully.".to_string(),
        }
    }
}

/// Service status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub status: String,
}
