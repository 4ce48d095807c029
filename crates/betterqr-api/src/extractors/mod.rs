//! Custom Axum extractors.

pub mod auth;
pub mod client;

pub use auth::{AuthenticatedSession, CurrentUser};
pub use client::ClientMeta;
