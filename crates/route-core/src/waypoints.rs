//! Ordered, capacity-limited collection of route waypoints.

use chrono::Utc;

use crate::error::RouteError;
use crate::geo::Coordinate;
use crate::models::{Waypoint, WaypointId, WaypointStatus};
use crate::rules::DEFAULT_MAX_WAYPOINTS;

/// Canonical owner of waypoint records, kept in insertion order.
#[derive(Debug, Clone)]
pub struct WaypointStore {
    waypoints: Vec<Waypoint>,
    max_waypoints: usize,
}

impl Default for WaypointStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WAYPOINTS)
    }
}

impl WaypointStore {
    pub fn new(max_waypoints: usize) -> Self {
        Self {
            waypoints: Vec::with_capacity(max_waypoints),
            max_waypoints,
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_waypoints
    }

    /// Record a new pending waypoint.
    ///
    /// Fails with `CapacityExceeded` once the store is full; existing
    /// waypoints are left untouched.
    pub fn add(
        &mut self,
        coordinate: Coordinate,
        label: impl Into<String>,
    ) -> Result<Waypoint, RouteError> {
        if self.waypoints.len() >= self.max_waypoints {
            return Err(RouteError::CapacityExceeded {
                max: self.max_waypoints,
            });
        }
        coordinate.validate()?;

        let waypoint = Waypoint {
            id: WaypointId::new(),
            coordinate,
            label: label.into(),
            status: WaypointStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.waypoints.push(waypoint.clone());
        Ok(waypoint)
    }

    /// Mark a waypoint completed.
    ///
    /// Returns `true` when the status changed and `false` when the waypoint
    /// was already completed.
    pub fn complete(&mut self, id: WaypointId) -> Result<bool, RouteError> {
        let waypoint = self
            .waypoints
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(RouteError::UnknownWaypoint(id))?;

        if waypoint.status == WaypointStatus::Completed {
            return Ok(false);
        }
        waypoint.status = WaypointStatus::Completed;
        waypoint.completed_at = Some(Utc::now());
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.id == id)
    }

    /// Pending waypoints in insertion order.
    pub fn pending(&self) -> Vec<Waypoint> {
        self.waypoints.iter().filter(|w| w.is_pending()).cloned().collect()
    }

    pub fn all(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.waypoints.iter().filter(|w| w.is_pending()).count()
    }

    /// True iff at least one waypoint exists and none is pending.
    pub fn all_completed(&self) -> bool {
        !self.waypoints.is_empty() && self.pending_count() == 0
    }
}
