//! `CurrentUser` extractor: the identity the session gate attached.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;

use betterqr_entity::user::UserIdentity;

/// Where protected routes send anonymous callers.
pub const NOT_LOGGED_IN_REDIRECT: &str = "/login?utm_source=internal&utm_medium=redirect&utm_campaign=login_redirect&utm_content=not_logged_in";

/// Request extension set by the session gate for a valid session.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: UserIdentity,
    pub sid: String,
}

/// The logged-in user. Rejects anonymous requests with a redirect to the
/// login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserIdentity);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedSession>()
            .map(|s| CurrentUser(s.user.clone()))
            .ok_or_else(|| Redirect::to(NOT_LOGGED_IN_REDIRECT))
    }
}
