//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use betterqr_auth::{LoginService, SessionManager};
use betterqr_core::config::AppConfig;
use betterqr_core::error::{AppError, ErrorKind};

/// Shared dependencies, passed to every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Session lifecycle manager.
    pub session_manager: SessionManager,
    /// Credential login flow.
    pub login_service: LoginService,
    /// Key encrypting the session and notice cookies.
    pub cookie_key: Key,
}

impl AppState {
    /// Builds the state, deriving the cookie key from `auth.cookie_secret`.
    pub fn new(
        config: AppConfig,
        session_manager: SessionManager,
        login_service: LoginService,
    ) -> Result<Self, AppError> {
        let cookie_key = Key::try_from(config.auth.cookie_secret.as_bytes()).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "auth.cookie_secret is too short for a cookie key",
                e,
            )
        })?;

        Ok(Self {
            config: Arc::new(config),
            session_manager,
            login_service,
            cookie_key,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("session_manager", &self.session_manager)
            .finish_non_exhaustive()
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
