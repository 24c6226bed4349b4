//! Route Maps - geocoding and directions provider client
//!
//! Handles all communication with the maps web services: resolving street
//! labels for plotted stops and fetching optimized driving routes.

pub mod client;
pub mod directions;
pub mod geocode;

pub use client::MapsClient;
pub use directions::{plan_from_response, DirectionsResponse};
pub use geocode::{label_from_response, offline_label, GeocodeResponse};
