//! Core data models for route progress tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinate;

/// Opaque, stable identity of a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(Uuid);

impl WaypointId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WaypointId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WaypointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for WaypointId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointStatus {
    /// Not yet visited
    #[default]
    Pending,
    /// Confirmed by the user; never reverts
    Completed,
}

/// A stop the user plotted on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub coordinate: Coordinate,
    /// Street address resolved by the geocoding provider
    pub label: String,
    pub status: WaypointStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Waypoint {
    pub fn is_pending(&self) -> bool {
        self.status == WaypointStatus::Pending
    }

    /// First comma-separated segment of the label, e.g. the street line of an address.
    pub fn short_label(&self) -> &str {
        self.label.split(',').next().unwrap_or_default().trim()
    }
}

/// A single position reported by the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub coordinate: Coordinate,
    pub received_at: DateTime<Utc>,
}

impl PositionSample {
    pub fn now(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            received_at: Utc::now(),
        }
    }
}

/// Lifecycle of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum RoutePhase {
    /// No waypoints
    Idle,
    /// Waypoints exist, route not yet requested
    Planning,
    /// Route requested, watching for nearby stops
    Navigating,
    /// Waiting for the user to confirm arrival at a stop
    PromptOpen { waypoint_id: WaypointId, distance_m: f64 },
    /// Every waypoint completed
    Finished { route_requested: bool },
}

impl RoutePhase {
    pub fn route_requested(&self) -> bool {
        match self {
            RoutePhase::Navigating | RoutePhase::PromptOpen { .. } => true,
            RoutePhase::Finished { route_requested } => *route_requested,
            RoutePhase::Idle | RoutePhase::Planning => false,
        }
    }
}

/// Outstanding "arriving at ..., mark as complete?" question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityPrompt {
    pub waypoint: Waypoint,
    /// Distance at the sample that opened the prompt
    pub distance_m: f64,
}

/// Waypoint as listed to the user, with distance from the current position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointView {
    #[serde(flatten)]
    pub waypoint: Waypoint,
    pub short_label: String,
    pub distance_m: Option<f64>,
}

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteView {
    pub phase: RoutePhase,
    pub waypoints: Vec<WaypointView>,
    pub route_requested: bool,
    pub finished: bool,
    pub prompt: Option<ProximityPrompt>,
    pub tracking_enabled: bool,
    pub breadcrumb: Vec<Coordinate>,
    pub current_position: Option<Coordinate>,
}

/// Request handed to the routing provider for an optimized driving route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    /// Remaining stops, in insertion order
    pub waypoints: Vec<Coordinate>,
    pub optimize: bool,
}

/// Route geometry returned by the routing provider. Only rendered, never consumed by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Visiting order of `RouteRequest::waypoints` chosen by the provider
    pub waypoint_order: Vec<usize>,
    /// Encoded polyline of the whole route
    pub overview_polyline: String,
    pub distance_m: f64,
    pub duration_s: f64,
}
