//! # betterqr-api
//!
//! HTTP layer for BetterQR built on Axum.
//!
//! Provides the page routes, the JSON endpoints, the session gate that runs
//! before every request, request logging, extractors, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::ApiError;
pub use state::AppState;
