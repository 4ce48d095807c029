//! Session repository: atomic edits of the JSONB session arrays.
//!
//! Each write is one `UPDATE` on one row, so concurrent appends and pulls
//! on the same user serialize on the row lock instead of overwriting each
//! other.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tokio::sync::OnceCell;
use tracing::info;
use uuid::Uuid;

use betterqr_core::error::{AppError, ErrorKind};
use betterqr_core::logging::DB;
use betterqr_core::result::AppResult;
use betterqr_entity::session::Session;
use betterqr_entity::user::User;

/// Repository for session array operations on the `users` table.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
    retention_index: Arc<OnceCell<()>>,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            retention_index: Arc::new(OnceCell::new()),
        }
    }

    /// Find the user whose active sessions contain `sid`.
    pub async fn find_user_by_sid(&self, sid: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users \
             WHERE sessions @> jsonb_build_array(jsonb_build_object('sid', $1::text)) \
             LIMIT 1",
        )
        .bind(sid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by session", e))
    }

    /// Append a session to the user's active sessions.
    ///
    /// Returns `false` when the user does not exist.
    pub async fn push_session(&self, user_uuid: Uuid, session: &Session) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET sessions = sessions || jsonb_build_array($2::jsonb) \
             WHERE uuid = $1",
        )
        .bind(user_uuid)
        .bind(Json(session))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append session", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove the active session `sid` from the user.
    ///
    /// Returns `false` when no such session was present.
    pub async fn pull_session(&self, user_uuid: Uuid, sid: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET sessions = COALESCE(\
               (SELECT jsonb_agg(elem ORDER BY ord) \
                FROM jsonb_array_elements(sessions) WITH ORDINALITY AS t(elem, ord) \
                WHERE elem->>'sid' <> $2), \
               '[]'::jsonb) \
             WHERE uuid = $1 \
               AND sessions @> jsonb_build_array(jsonb_build_object('sid', $2::text))",
        )
        .bind(user_uuid)
        .bind(sid)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove session", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Move `session` from `sessions` into `logged_out_sessions` in one update.
    ///
    /// Returns `false` when the session was no longer active.
    pub async fn move_to_revoked(&self, user_uuid: Uuid, session: &Session) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET \
               logged_out_sessions = logged_out_sessions || jsonb_build_array($3::jsonb), \
               sessions = COALESCE(\
                 (SELECT jsonb_agg(elem ORDER BY ord) \
                  FROM jsonb_array_elements(sessions) WITH ORDINALITY AS t(elem, ord) \
                  WHERE elem->>'sid' <> $2), \
                 '[]'::jsonb) \
             WHERE uuid = $1 \
               AND sessions @> jsonb_build_array(jsonb_build_object('sid', $2::text))",
        )
        .bind(user_uuid)
        .bind(&session.sid)
        .bind(Json(session))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke session", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Create the index backing retention sweeps, once per process.
    ///
    /// A partial index over users with at least one revoked session, matching
    /// the predicate in [`Self::purge_revoked_before`], so a sweep only visits
    /// rows that can hold expired entries.
    pub async fn ensure_retention_index(&self) -> AppResult<()> {
        self.retention_index
            .get_or_try_init(|| async {
                sqlx::query(
                    "CREATE INDEX IF NOT EXISTS idx_users_revoked_pending \
                     ON users (uuid) \
                     WHERE jsonb_array_length(logged_out_sessions) > 0",
                )
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to create retention index",
                        e,
                    )
                })?;
                info!(target: DB, "Retention index ensured on users with revoked sessions");
                Ok::<(), AppError>(())
            })
            .await?;
        Ok(())
    }

    /// Drop revoked entries created before `cutoff` from every user.
    ///
    /// Returns the number of users whose revoked list shrank.
    pub async fn purge_revoked_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE users SET logged_out_sessions = COALESCE(\
               (SELECT jsonb_agg(elem ORDER BY ord) \
                FROM jsonb_array_elements(logged_out_sessions) WITH ORDINALITY AS t(elem, ord) \
                WHERE (elem->>'created_at')::timestamptz >= $1), \
               '[]'::jsonb) \
             WHERE jsonb_array_length(logged_out_sessions) > 0 \
               AND EXISTS (\
               SELECT 1 FROM jsonb_array_elements(logged_out_sessions) AS e(elem) \
               WHERE (e.elem->>'created_at')::timestamptz < $1)",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to purge revoked sessions", e)
        })?;
        Ok(result.rows_affected())
    }

    /// The user's revoked sessions created at or after `not_before`, oldest first.
    pub async fn list_revoked(
        &self,
        user_uuid: Uuid,
        not_before: DateTime<Utc>,
    ) -> AppResult<Vec<Session>> {
        let rows = sqlx::query_scalar::<_, Json<Session>>(
            "SELECT elem FROM users, \
               jsonb_array_elements(logged_out_sessions) WITH ORDINALITY AS t(elem, ord) \
             WHERE uuid = $1 AND (elem->>'created_at')::timestamptz >= $2 \
             ORDER BY ord",
        )
        .bind(user_uuid)
        .bind(not_before)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list revoked sessions", e)
        })?;
        Ok(rows.into_iter().map(|Json(s)| s).collect())
    }
}
