//! Login and logout handlers.

use axum::extract::State;
use axum::response::Redirect;
use axum::{Form, Json};
use axum_extra::extract::PrivateCookieJar;
use tracing::{error, info, warn};

use betterqr_auth::{LoginAttempt, RevokeResult};
use betterqr_core::logging::MAIN;

use crate::dto::{LoginForm, LoginResponse};
use crate::error::ApiError;
use crate::extractors::ClientMeta;
use crate::middleware::session::{session_cookie, session_cookie_removal};
use crate::state::AppState;

/// POST /login, POST /api/forms/login
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    client: ClientMeta,
    Form(form): Form<LoginForm>,
) -> Result<(PrivateCookieJar, Json<LoginResponse>), ApiError> {
    let outcome = state
        .login_service
        .login(LoginAttempt {
            email: form.email,
            password: form.password,
            captcha_token: form.captcha_token,
            client_ip: client.ip,
            user_agent: client.user_agent,
        })
        .await?;

    let jar = jar.add(session_cookie(&state.config, outcome.session.sid));
    Ok((jar, Json(LoginResponse::success())))
}

/// GET /logout
///
/// Always clears the session cookie and redirects home, whether or not the
/// session could be revoked.
pub async fn logout(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    let cookie_name = &state.config.session.cookie_name;
    let Some(sid) = jar.get(cookie_name).map(|c| c.value().to_string()) else {
        return (jar, Redirect::to("/"));
    };

    match state.session_manager.revoke(&sid).await {
        Ok(RevokeResult::Revoked) => info!(target: MAIN, "User logged out"),
        Ok(RevokeResult::NotFound) => warn!(target: MAIN, "Logout for an unknown session"),
        Err(e) => error!(target: MAIN, error = %e, "Failed to revoke session on logout"),
    }

    let jar = jar.remove(session_cookie_removal(&state.config));
    (jar, Redirect::to("/"))
}
