//! Error kinds surfaced by the route progress engine.

use thiserror::Error;

use crate::models::WaypointId;

/// Typed failures returned to the presentation layer.
///
/// None of these are fatal; every rejected call leaves engine state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("route already holds the maximum of {max} waypoints")]
    CapacityExceeded { max: usize },

    #[error("no waypoints defined for this route")]
    NoWaypoints,

    #[error("unknown waypoint {0}")]
    UnknownWaypoint(WaypointId),

    #[error("could not resolve a label for the selected location: {0}")]
    LabelResolutionFailed(String),

    #[error("waypoints cannot be added once a route has been requested")]
    RouteLocked,

    #[error("no proximity prompt is open")]
    NoPromptOpen,

    #[error("route is not finished")]
    RouteNotFinished,

    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}

impl RouteError {
    /// Stable machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteError::CapacityExceeded { .. } => "capacity_exceeded",
            RouteError::NoWaypoints => "no_waypoints",
            RouteError::UnknownWaypoint(_) => "unknown_waypoint",
            RouteError::LabelResolutionFailed(_) => "label_resolution_failed",
            RouteError::RouteLocked => "route_locked",
            RouteError::NoPromptOpen => "no_prompt_open",
            RouteError::RouteNotFinished => "route_not_finished",
            RouteError::InvalidCoordinate { .. } => "invalid_coordinate",
        }
    }
}
