//! Session gate: validates the session cookie before any handler runs.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::{debug, error, info};

use betterqr_auth::{InvalidReason, ValidationResult};
use betterqr_core::config::AppConfig;
use betterqr_core::logging::MAIN;

use crate::error::ApiError;
use crate::extractors::AuthenticatedSession;
use crate::state::AppState;

/// Cookie carrying a one-shot notice for the next page view.
pub const NOTICE_COOKIE: &str = "notice";

/// Notice shown after an expired or unknown session is dropped.
pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired, please log in again.";

/// Where callers with a dead session are sent.
pub const SESSION_EXPIRED_REDIRECT: &str = "/login?utm_source=internal&utm_medium=redirect&utm_campaign=login_redirect&utm_content=session_expired";

/// Builds the encrypted session cookie for `sid`.
pub fn session_cookie(config: &AppConfig, sid: String) -> Cookie<'static> {
    Cookie::build((config.session.cookie_name.clone(), sid))
        .http_only(true)
        .secure(config.auth.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// A cookie value matching the session cookie's path, for removal.
pub fn session_cookie_removal(config: &AppConfig) -> Cookie<'static> {
    Cookie::build(config.session.cookie_name.clone())
        .path("/")
        .build()
}

fn notice_cookie(config: &AppConfig, message: &str) -> Cookie<'static> {
    Cookie::build((NOTICE_COOKIE, message.to_string()))
        .http_only(true)
        .secure(config.auth.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Validates the caller's session, if any.
///
/// No cookie passes through untouched. A valid session attaches an
/// [`AuthenticatedSession`] to the request. An unknown or expired session
/// clears the cookie, queues a notice, and redirects to the login page.
pub async fn session_gate(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let config = &state.config;
    let Some(sid) = jar
        .get(&config.session.cookie_name)
        .map(|c| c.value().to_string())
    else {
        return next.run(request).await;
    };

    let result = match state.session_manager.validate(&sid).await {
        Ok(result) => result,
        Err(e) => return ApiError(e).into_response(),
    };

    match result {
        ValidationResult::Valid { user, .. } => {
            debug!(target: MAIN, user = %user.uuid, "Session accepted");
            request
                .extensions_mut()
                .insert(AuthenticatedSession { user, sid });
            next.run(request).await
        }
        ValidationResult::Invalid(reason) => {
            if let InvalidReason::Expired { user } = &reason {
                info!(target: MAIN, user = %user.uuid, "Session expired");
                if let Err(e) = state.session_manager.discard_expired(user, &sid).await {
                    error!(target: MAIN, error = %e, "Failed to discard expired session");
                }
            } else {
                info!(target: MAIN, "Unknown session presented");
            }

            let jar = jar
                .remove(session_cookie_removal(config))
                .add(notice_cookie(config, SESSION_EXPIRED_NOTICE));
            (jar, Redirect::to(SESSION_EXPIRED_REDIRECT)).into_response()
        }
    }
}
