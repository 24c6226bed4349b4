//! Shared library surface for route server utilities and tests.

pub mod api;
pub mod config;
pub mod loops;
pub mod state;
