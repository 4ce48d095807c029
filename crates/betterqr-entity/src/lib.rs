//! # betterqr-entity
//!
//! Domain entity models for BetterQR. A [`user::User`] row owns its login
//! sessions as two ordered arrays: the active `sessions` and the revoked
//! `logged_out_sessions`. Database entities derive `sqlx::FromRow`; the
//! session arrays are decoded from JSONB.

pub mod session;
pub mod user;
