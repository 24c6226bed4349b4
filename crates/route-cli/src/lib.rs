//! Route CLI - command line tools for the route progress server.
//!
//! This crate provides:
//! - drive_route: drives a simulated vehicle through a list of stops

pub mod sim;
