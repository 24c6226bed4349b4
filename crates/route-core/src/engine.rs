//! Route progress state machine.
//!
//! Orchestrates the waypoint store, proximity monitor and track recorder
//! behind a single synchronous API. Callers feed already-resolved inputs
//! (labels from the geocoder, samples from the location provider) one call
//! at a time; nothing in here blocks or retries.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::RouteError;
use crate::geo::{haversine_distance, Coordinate};
use crate::models::{
    ProximityPrompt, RoutePhase, RouteRequest, RouteView, Waypoint, WaypointId, WaypointView,
};
use crate::proximity::ProximityMonitor;
use crate::rules::ProgressRules;
use crate::track::TrackRecorder;
use crate::waypoints::WaypointStore;

/// Summary handed back when a finished journey is reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySummary {
    pub stops: Vec<Waypoint>,
    pub breadcrumb_points: usize,
}

/// Owner of the route lifecycle and the single proximity prompt slot.
#[derive(Debug, Clone)]
pub struct RouteProgressEngine {
    rules: ProgressRules,
    store: WaypointStore,
    monitor: ProximityMonitor,
    track: TrackRecorder,
    phase: RoutePhase,
    last_position: Option<Coordinate>,
    /// Bumped every time the route is cleared
    generation: u64,
}

impl Default for RouteProgressEngine {
    fn default() -> Self {
        Self::new(ProgressRules::default())
    }
}

impl RouteProgressEngine {
    pub fn new(rules: ProgressRules) -> Self {
        Self {
            store: WaypointStore::new(rules.max_waypoints),
            monitor: ProximityMonitor::new(rules.proximity_threshold_m),
            track: TrackRecorder::default(),
            phase: RoutePhase::Idle,
            last_position: None,
            generation: 0,
            rules,
        }
    }

    pub fn rules(&self) -> &ProgressRules {
        &self.rules
    }

    pub fn phase(&self) -> RoutePhase {
        self.phase
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.store.all()
    }

    pub fn breadcrumb(&self) -> &[Coordinate] {
        self.track.breadcrumb()
    }

    pub fn tracking_enabled(&self) -> bool {
        self.track.is_enabled()
    }

    /// Last position received, whether or not it was recorded in the breadcrumb.
    pub fn current_position(&self) -> Option<Coordinate> {
        self.last_position
    }

    /// Identifies the current route. Changes whenever the route is cleared,
    /// so results fetched for an older route can be recognised and dropped.
    pub fn route_generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.store.all_completed()
    }

    /// The outstanding prompt, if one is open.
    pub fn prompt(&self) -> Option<ProximityPrompt> {
        match self.phase {
            RoutePhase::PromptOpen {
                waypoint_id,
                distance_m,
            } => self.store.get(waypoint_id).map(|waypoint| ProximityPrompt {
                waypoint: waypoint.clone(),
                distance_m,
            }),
            _ => None,
        }
    }

    /// Record a waypoint with an already-resolved label.
    ///
    /// Rejected without any state change once a route has been requested,
    /// when the store is full, or when the label is blank.
    pub fn add_waypoint(
        &mut self,
        coordinate: Coordinate,
        label: impl Into<String>,
    ) -> Result<Waypoint, RouteError> {
        if self.phase.route_requested() {
            tracing::debug!("Rejected waypoint at {}: route already requested", coordinate);
            return Err(RouteError::RouteLocked);
        }

        let label = label.into();
        if label.trim().is_empty() {
            return Err(RouteError::LabelResolutionFailed(
                "geocoder returned an empty label".to_string(),
            ));
        }

        let waypoint = self.store.add(coordinate, label)?;
        self.phase = RoutePhase::Planning;
        tracing::info!(
            "Added waypoint {} '{}' ({}/{})",
            waypoint.id,
            waypoint.short_label(),
            self.store.len(),
            self.store.capacity()
        );
        Ok(waypoint)
    }

    /// Record a waypoint from the outcome of a label lookup.
    ///
    /// A failed lookup aborts the add and surfaces `LabelResolutionFailed`.
    pub fn add_resolved_waypoint<E: Display>(
        &mut self,
        coordinate: Coordinate,
        label: Result<String, E>,
    ) -> Result<Waypoint, RouteError> {
        match label {
            Ok(label) => self.add_waypoint(coordinate, label),
            Err(e) => {
                tracing::warn!("Label lookup failed for {}: {}", coordinate, e);
                Err(RouteError::LabelResolutionFailed(e.to_string()))
            }
        }
    }

    /// Start navigating. Returns `true` if the phase changed.
    pub fn request_route(&mut self) -> Result<bool, RouteError> {
        match self.phase {
            RoutePhase::Idle => Err(RouteError::NoWaypoints),
            RoutePhase::Planning => {
                self.phase = RoutePhase::Navigating;
                tracing::info!("Route requested with {} stop(s)", self.store.len());
                Ok(true)
            }
            RoutePhase::Navigating
            | RoutePhase::PromptOpen { .. }
            | RoutePhase::Finished { .. } => Ok(false),
        }
    }

    /// Feed one position sample.
    ///
    /// Always reaches the track recorder. While navigating with no prompt
    /// open, the first pending waypoint inside the threshold opens a prompt,
    /// which is returned.
    pub fn on_position_update(
        &mut self,
        coord: Coordinate,
    ) -> Result<Option<ProximityPrompt>, RouteError> {
        coord.validate()?;
        self.track.on_sample(coord);
        self.last_position = Some(coord);

        if self.phase != RoutePhase::Navigating {
            return Ok(None);
        }

        let Some(hit) = self.monitor.evaluate(&coord, &self.store.pending()) else {
            return Ok(None);
        };

        tracing::info!(
            "Approaching '{}' ({:.0}m away), prompting for completion",
            hit.waypoint.short_label(),
            hit.distance_m
        );
        self.phase = RoutePhase::PromptOpen {
            waypoint_id: hit.waypoint.id,
            distance_m: hit.distance_m,
        };
        Ok(Some(ProximityPrompt {
            waypoint: hit.waypoint,
            distance_m: hit.distance_m,
        }))
    }

    /// Answer the open prompt and return the resulting phase.
    ///
    /// Declining leaves the waypoint pending, so a later sample in range
    /// prompts again.
    pub fn resolve_prompt(&mut self, accept: bool) -> Result<RoutePhase, RouteError> {
        let RoutePhase::PromptOpen { waypoint_id, .. } = self.phase else {
            return Err(RouteError::NoPromptOpen);
        };

        if accept {
            self.store.complete(waypoint_id)?;
            tracing::info!("Waypoint {} confirmed", waypoint_id);
        } else {
            tracing::debug!("Prompt for waypoint {} declined", waypoint_id);
        }

        self.phase = if self.store.all_completed() {
            tracing::info!("All {} stop(s) completed, route finished", self.store.len());
            RoutePhase::Finished {
                route_requested: true,
            }
        } else {
            RoutePhase::Navigating
        };
        Ok(self.phase)
    }

    /// Mark a waypoint completed straight from the list, without a prompt.
    ///
    /// Discards the open prompt if it targets the same waypoint. Returns
    /// `true` if the status changed.
    pub fn complete_waypoint(&mut self, id: WaypointId) -> Result<bool, RouteError> {
        let changed = self.store.complete(id)?;

        if let RoutePhase::PromptOpen { waypoint_id, .. } = self.phase {
            if waypoint_id == id {
                self.phase = RoutePhase::Navigating;
            }
        }

        if self.store.all_completed() && !matches!(self.phase, RoutePhase::Finished { .. }) {
            tracing::info!("All {} stop(s) completed, route finished", self.store.len());
            self.phase = RoutePhase::Finished {
                route_requested: self.phase.route_requested(),
            };
        }
        Ok(changed)
    }

    /// Drop every waypoint, the breadcrumb and any open prompt.
    pub fn clear_route(&mut self) {
        self.store.clear();
        self.track.clear();
        self.phase = RoutePhase::Idle;
        self.generation += 1;
        tracing::info!("Route cleared");
    }

    /// Flip live tracking; history is discarded either way.
    pub fn toggle_tracking(&mut self) -> bool {
        let enabled = self.track.toggle();
        tracing::info!("Live tracking {}", if enabled { "on" } else { "off" });
        enabled
    }

    /// Report a finished journey and reset for the next one.
    pub fn report_journey_complete(&mut self) -> Result<JourneySummary, RouteError> {
        if !matches!(self.phase, RoutePhase::Finished { .. }) {
            return Err(RouteError::RouteNotFinished);
        }

        let summary = JourneySummary {
            stops: self.store.all().to_vec(),
            breadcrumb_points: self.track.breadcrumb().len(),
        };
        tracing::info!(
            "Journey completed: {} stop(s), {} breadcrumb point(s)",
            summary.stops.len(),
            summary.breadcrumb_points
        );
        self.clear_route();
        Ok(summary)
    }

    /// Build the request for the routing provider.
    ///
    /// The origin falls back to the current position. The last pending stop
    /// is the destination; the rest are intermediates the provider may reorder.
    pub fn route_request(&self, origin: Option<Coordinate>) -> Option<RouteRequest> {
        let origin = origin.or(self.last_position)?;
        let mut pending: Vec<Coordinate> =
            self.store.pending().into_iter().map(|w| w.coordinate).collect();
        let destination = pending.pop()?;

        Some(RouteRequest {
            origin,
            destination,
            waypoints: pending,
            optimize: true,
        })
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> RouteView {
        let waypoints = self
            .store
            .all()
            .iter()
            .map(|waypoint| WaypointView {
                short_label: waypoint.short_label().to_string(),
                distance_m: self.last_position.map(|pos| {
                    haversine_distance(
                        pos.latitude,
                        pos.longitude,
                        waypoint.coordinate.latitude,
                        waypoint.coordinate.longitude,
                    )
                }),
                waypoint: waypoint.clone(),
            })
            .collect();

        RouteView {
            phase: self.phase,
            waypoints,
            route_requested: self.phase.route_requested(),
            finished: self.is_finished(),
            prompt: self.prompt(),
            tracking_enabled: self.track.is_enabled(),
            breadcrumb: self.track.breadcrumb().to_vec(),
            current_position: self.last_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::offset_by_meters;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn request_route_requires_waypoints() {
        let mut engine = RouteProgressEngine::default();
        assert_eq!(engine.request_route(), Err(RouteError::NoWaypoints));
        assert_eq!(engine.phase(), RoutePhase::Idle);
    }

    #[test]
    fn request_route_twice_is_noop() {
        let mut engine = RouteProgressEngine::default();
        engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();
        assert_eq!(engine.request_route(), Ok(true));
        assert_eq!(engine.request_route(), Ok(false));
        assert_eq!(engine.phase(), RoutePhase::Navigating);
    }

    #[test]
    fn samples_do_not_prompt_while_planning() {
        let mut engine = RouteProgressEngine::default();
        engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();
        assert_eq!(engine.on_position_update(coord(10.0, 10.0)), Ok(None));
        assert_eq!(engine.phase(), RoutePhase::Planning);
        assert_eq!(engine.breadcrumb().len(), 1);
    }

    #[test]
    fn only_one_prompt_at_a_time() {
        let mut engine = RouteProgressEngine::default();
        let origin = coord(10.0, 10.0);
        let a = engine.add_waypoint(origin, "A").unwrap();
        let b = engine
            .add_waypoint(offset_by_meters(&origin, 20.0, 0.0), "B")
            .unwrap();
        engine.request_route().unwrap();

        let prompt = engine.on_position_update(origin).unwrap().expect("prompt");
        assert_eq!(prompt.waypoint.id, a.id);

        // Still inside range of both; the open prompt is not replaced.
        assert_eq!(
            engine.on_position_update(offset_by_meters(&origin, 20.0, 0.0)),
            Ok(None)
        );
        assert_eq!(engine.prompt().map(|p| p.waypoint.id), Some(a.id));

        engine.resolve_prompt(true).unwrap();
        let next = engine
            .on_position_update(offset_by_meters(&origin, 20.0, 0.0))
            .unwrap()
            .expect("prompt");
        assert_eq!(next.waypoint.id, b.id);
    }

    #[test]
    fn resolve_without_prompt_fails() {
        let mut engine = RouteProgressEngine::default();
        assert_eq!(engine.resolve_prompt(true), Err(RouteError::NoPromptOpen));
        engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();
        engine.request_route().unwrap();
        assert_eq!(engine.resolve_prompt(false), Err(RouteError::NoPromptOpen));
        assert_eq!(engine.phase(), RoutePhase::Navigating);
    }

    #[test]
    fn clearing_starts_a_new_route_generation() {
        let mut engine = RouteProgressEngine::default();
        let first = engine.route_generation();
        engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();
        engine.request_route().unwrap();
        assert_eq!(engine.route_generation(), first);

        engine.clear_route();
        let second = engine.route_generation();
        assert_ne!(second, first);

        let a = engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();
        engine.complete_waypoint(a.id).unwrap();
        engine.report_journey_complete().unwrap();
        assert_ne!(engine.route_generation(), second);
    }

    #[test]
    fn failed_label_lookup_leaves_state_untouched() {
        let mut engine = RouteProgressEngine::default();
        engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();

        let err = engine
            .add_resolved_waypoint(coord(11.0, 11.0), Err::<String, _>("ZERO_RESULTS"))
            .unwrap_err();
        assert!(matches!(err, RouteError::LabelResolutionFailed(_)));
        assert_eq!(engine.waypoints().len(), 1);

        let err = engine.add_waypoint(coord(11.0, 11.0), "  ").unwrap_err();
        assert!(matches!(err, RouteError::LabelResolutionFailed(_)));
        assert_eq!(engine.waypoints().len(), 1);
    }

    #[test]
    fn invalid_sample_is_rejected_before_recording() {
        let mut engine = RouteProgressEngine::default();
        let bad = Coordinate {
            latitude: f64::NAN,
            longitude: 0.0,
        };
        assert!(engine.on_position_update(bad).is_err());
        assert!(engine.breadcrumb().is_empty());
        assert_eq!(engine.current_position(), None);
    }

    #[test]
    fn manual_completion_discards_matching_prompt() {
        let mut engine = RouteProgressEngine::default();
        let a = engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();
        engine.add_waypoint(coord(20.0, 20.0), "B").unwrap();
        engine.request_route().unwrap();
        engine.on_position_update(coord(10.0, 10.0)).unwrap();

        assert_eq!(engine.complete_waypoint(a.id), Ok(true));
        assert_eq!(engine.phase(), RoutePhase::Navigating);
        assert!(engine.prompt().is_none());
        assert_eq!(engine.complete_waypoint(a.id), Ok(false));
    }

    #[test]
    fn manual_completion_of_last_stop_finishes() {
        let mut engine = RouteProgressEngine::default();
        let a = engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();
        engine.complete_waypoint(a.id).unwrap();
        assert_eq!(
            engine.phase(),
            RoutePhase::Finished {
                route_requested: false
            }
        );
        assert!(engine.view().finished);

        // Route was never requested, so more stops may still be plotted.
        engine.add_waypoint(coord(20.0, 20.0), "B").unwrap();
        assert_eq!(engine.phase(), RoutePhase::Planning);
        assert!(!engine.is_finished());
    }

    #[test]
    fn report_requires_finished_route() {
        let mut engine = RouteProgressEngine::default();
        let a = engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();
        assert_eq!(
            engine.report_journey_complete(),
            Err(RouteError::RouteNotFinished)
        );

        engine.request_route().unwrap();
        engine.on_position_update(coord(10.0, 10.0)).unwrap();
        engine.resolve_prompt(true).unwrap();

        let summary = engine.report_journey_complete().unwrap();
        assert_eq!(summary.stops.len(), 1);
        assert_eq!(summary.stops[0].id, a.id);
        assert_eq!(summary.breadcrumb_points, 1);
        assert_eq!(engine.phase(), RoutePhase::Idle);
        assert!(engine.waypoints().is_empty());
    }

    #[test]
    fn route_request_uses_pending_stops() {
        let mut engine = RouteProgressEngine::default();
        assert!(engine.route_request(Some(coord(0.0, 0.0))).is_none());

        let a = engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();
        engine.add_waypoint(coord(20.0, 20.0), "B").unwrap();
        engine.add_waypoint(coord(30.0, 30.0), "C").unwrap();
        assert!(engine.route_request(None).is_none());

        engine.complete_waypoint(a.id).unwrap();
        engine.on_position_update(coord(1.0, 1.0)).unwrap();
        let request = engine.route_request(None).expect("request");
        assert_eq!(request.origin, coord(1.0, 1.0));
        assert_eq!(request.destination, coord(30.0, 30.0));
        assert_eq!(request.waypoints, vec![coord(20.0, 20.0)]);
        assert!(request.optimize);
    }

    #[test]
    fn view_reports_distances_from_current_position() {
        let mut engine = RouteProgressEngine::default();
        let origin = coord(10.0, 10.0);
        engine
            .add_waypoint(offset_by_meters(&origin, 500.0, 0.0), "1 Main St, Springfield")
            .unwrap();
        assert_eq!(engine.view().waypoints[0].distance_m, None);

        engine.on_position_update(origin).unwrap();
        let view = engine.view();
        let listed = &view.waypoints[0];
        assert_eq!(listed.short_label, "1 Main St");
        let distance = listed.distance_m.expect("distance");
        assert!((distance - 500.0).abs() < 5.0, "got {distance}");
        assert_eq!(view.current_position, Some(origin));
    }

    #[test]
    fn view_serializes_phase_by_name() {
        let mut engine = RouteProgressEngine::default();
        engine.add_waypoint(coord(10.0, 10.0), "A").unwrap();
        let json = serde_json::to_value(engine.view()).unwrap();
        assert_eq!(json["phase"]["name"], "planning");
        assert_eq!(json["finished"], false);
        assert_eq!(json["waypoints"][0]["status"], "pending");
    }
}
