//! # betterqr-database
//!
//! PostgreSQL connection management and the repositories behind the
//! session store. Sessions live as JSONB arrays on the `users` table and
//! every mutation is a single-row `UPDATE`.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
