//! Thresholds and limits for route progress tracking.

use serde::{Deserialize, Serialize};

/// Distance under which a pending waypoint counts as reached.
pub const DEFAULT_PROXIMITY_THRESHOLD_M: f64 = 100.0;

/// Maximum number of stops on a single route.
pub const DEFAULT_MAX_WAYPOINTS: usize = 5;

/// Configuration for route progress rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRules {
    /// A pending waypoint closer than this (meters) opens a prompt
    pub proximity_threshold_m: f64,
    /// Maximum number of waypoints per route
    pub max_waypoints: usize,
}

impl Default for ProgressRules {
    fn default() -> Self {
        Self {
            proximity_threshold_m: DEFAULT_PROXIMITY_THRESHOLD_M,
            max_waypoints: DEFAULT_MAX_WAYPOINTS,
        }
    }
}
