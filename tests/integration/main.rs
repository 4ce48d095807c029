//! HTTP-level integration tests against the in-memory session store.

mod auth_test;
mod gate_test;
mod helpers;
mod pages_test;
