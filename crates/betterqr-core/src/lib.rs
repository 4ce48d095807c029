//! # betterqr-core
//!
//! Core crate for BetterQR. Contains configuration schemas, the named log
//! channels, and the unified error system.
//!
//! This crate has **no** internal dependencies on other BetterQR crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
