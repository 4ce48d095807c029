//! Route definitions for the BetterQR HTTP surface.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with every route and the session gate.
///
/// The gate wraps all routes, including the fallback, so every request
/// carrying a session cookie is validated before its handler runs.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(page_routes())
        .merge(api_routes())
        .fallback(handlers::pages::not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::session_gate,
        ))
        .with_state(state)
}

/// Browser-facing pages.
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::pages::index))
        .route(
            "/login",
            get(handlers::pages::login_page).post(handlers::auth::login),
        )
        .route("/logout", get(handlers::auth::logout))
        .route("/sitemap.xml", get(handlers::pages::sitemap))
        .route("/app", get(handlers::pages::app_home))
        .route("/app/", get(handlers::pages::app_home))
}

/// JSON endpoints under `/api`.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/forms/login", post(handlers::auth::login))
        .route("/api/users", get(handlers::users::status))
        .route("/api/users/", get(handlers::users::status))
}
