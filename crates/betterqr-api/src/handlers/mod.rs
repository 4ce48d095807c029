//! Route handlers.

pub mod auth;
pub mod pages;
pub mod users;
