pub mod engine;
pub mod error;
pub mod geo;
pub mod models;
pub mod proximity;
pub mod rules;
pub mod track;
pub mod waypoints;

pub use engine::{JourneySummary, RouteProgressEngine};
pub use error::RouteError;
pub use geo::{distance_m, haversine_distance, offset_by_meters, Coordinate};
pub use models::{
    PositionSample, ProximityPrompt, RoutePhase, RoutePlan, RouteRequest, RouteView, Waypoint,
    WaypointId, WaypointStatus, WaypointView,
};
pub use proximity::{ProximityHit, ProximityMonitor};
pub use rules::ProgressRules;
pub use track::TrackRecorder;
pub use waypoints::WaypointStore;
