//! Page routes.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::Cookie;
use tracing::warn;

use betterqr_core::logging::MAIN;

use crate::extractors::CurrentUser;
use crate::middleware::session::NOTICE_COOKIE;
use crate::state::AppState;

/// Body of every unmatched route.
pub const NOT_FOUND_BODY: &str = "The page you are looking for does not exist.";

/// GET /
pub async fn index() -> Html<&'static str> {
    Html("<!doctype html><title>BetterQR</title><h1>BetterQR</h1>")
}

/// GET /login
///
/// Shows and consumes any pending notice.
pub async fn login_page(jar: PrivateCookieJar) -> (PrivateCookieJar, Html<String>) {
    let notice = jar.get(NOTICE_COOKIE).map(|c| c.value().to_string());
    let jar = match notice {
        Some(_) => jar.remove(Cookie::build(NOTICE_COOKIE).path("/")),
        None => jar,
    };

    let banner = notice
        .map(|n| format!("<p class=\"notice\">{}</p>", escape_html(&n)))
        .unwrap_or_default();
    (
        jar,
        Html(format!(
            "<!doctype html><title>Log in | BetterQR</title>{banner}<h1>Log in</h1>"
        )),
    )
}

/// GET /app/
pub async fn app_home(CurrentUser(_user): CurrentUser) -> &'static str {
    "Welcome to the app!"
}

/// GET /sitemap.xml
pub async fn sitemap(State(state): State<AppState>) -> Response {
    match tokio::fs::read(&state.config.server.sitemap_path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/xml")], bytes).into_response(),
        Err(e) => {
            warn!(target: MAIN, path = %state.config.server.sitemap_path, error = %e, "Sitemap unavailable");
            not_found().await.into_response()
        }
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

fn escape_html(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '&' => "&amp;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            c => c.to_string(),
        })
        .collect()
}
