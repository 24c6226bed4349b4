//! Proximity detection between a live position and pending waypoints.

use crate::geo::{haversine_distance, Coordinate};
use crate::models::Waypoint;
use crate::rules::DEFAULT_PROXIMITY_THRESHOLD_M;

/// A pending waypoint found within the proximity threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityHit {
    pub waypoint: Waypoint,
    pub distance_m: f64,
}

/// Stateless "are we there yet" check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityMonitor {
    /// Strict upper bound (meters) for a waypoint to count as near
    pub threshold_m: f64,
}

impl Default for ProximityMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_PROXIMITY_THRESHOLD_M)
    }
}

impl ProximityMonitor {
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }

    /// Return the first waypoint in `pending` (sequence order, not nearest)
    /// that lies strictly closer than the threshold.
    pub fn evaluate(&self, position: &Coordinate, pending: &[Waypoint]) -> Option<ProximityHit> {
        pending
            .iter()
            .filter(|w| w.is_pending())
            .find_map(|waypoint| {
                let distance_m = haversine_distance(
                    position.latitude,
                    position.longitude,
                    waypoint.coordinate.latitude,
                    waypoint.coordinate.longitude,
                );
                (distance_m < self.threshold_m).then(|| ProximityHit {
                    waypoint: waypoint.clone(),
                    distance_m,
                })
            })
    }
}
