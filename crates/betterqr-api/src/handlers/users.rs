//! User API handlers.

use axum::Json;

use crate::dto::StatusResponse;

/// GET /api/users/
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        ok: true,
        status: "betterqr.app api".to_string(),
    })
}
