//! Simulation module for delivery drives.
//!
//! Provides drive paths and the HTTP client that plays them against the
//! route server.

mod client;
mod paths;

pub use client::RouteClient;
pub use paths::{parse_coordinate, DrivePath};
