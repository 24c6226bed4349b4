//! Server configuration from environment.

use route_core::ProgressRules;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub maps_base_url: String,
    /// Without a key the server runs offline: coordinate labels, no route geometry
    pub maps_api_key: Option<String>,
    pub proximity_threshold_m: f64,
    pub max_waypoints: usize,
    pub position_queue_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = ProgressRules::default();
        Self {
            server_port: env::var("ROUTE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            maps_base_url: env::var("MAPS_BASE_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com".to_string()),
            maps_api_key: env::var("MAPS_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            proximity_threshold_m: env::var("PROXIMITY_THRESHOLD_M")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|m: &f64| m.is_finite() && *m > 0.0)
                .unwrap_or(defaults.proximity_threshold_m),
            max_waypoints: env::var("MAX_WAYPOINTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_waypoints),
            position_queue_capacity: env::var("POSITION_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(64),
        }
    }

    pub fn rules(&self) -> ProgressRules {
        ProgressRules {
            proximity_threshold_m: self.proximity_threshold_m,
            max_waypoints: self.max_waypoints,
        }
    }
}
