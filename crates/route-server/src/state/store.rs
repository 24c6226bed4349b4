//! In-memory route state shared by the API and the position loop.

use route_core::{
    Coordinate, JourneySummary, PositionSample, RouteError, RoutePhase, RoutePlan,
    RouteProgressEngine, RouteView, Waypoint, WaypointId,
};
use route_maps::{offline_label, MapsClient};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, mpsc};

use crate::config::Config;

/// Broadcast buffer for WebSocket subscribers.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// What the presentation layer renders: engine snapshot plus route geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStatus {
    #[serde(flatten)]
    pub view: RouteView,
    pub plan: Option<RoutePlan>,
}

/// Why a position sample did not make it into the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// Loop is behind; the sample was dropped
    QueueFull,
    /// Loop has stopped
    Closed,
}

/// Application state - one engine guarded by a mutex, fed one call at a time.
pub struct AppState {
    engine: Mutex<RouteProgressEngine>,
    plan: Mutex<Option<RoutePlan>>,
    maps: Option<MapsClient>,
    config: Config,
    positions: mpsc::Sender<PositionSample>,
    pub tx: broadcast::Sender<RouteStatus>,
}

impl AppState {
    /// Build the state and the receiving end of the position queue.
    pub fn new(config: Config) -> anyhow::Result<(Self, mpsc::Receiver<PositionSample>)> {
        let maps = match config.maps_api_key.as_deref() {
            Some(key) => Some(MapsClient::new(&config.maps_base_url, key)?),
            None => {
                tracing::warn!(
                    "MAPS_API_KEY not set, using coordinate labels and no route geometry"
                );
                None
            }
        };

        let (positions, rx) = mpsc::channel(config.position_queue_capacity);
        let (tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        let state = Self {
            engine: Mutex::new(RouteProgressEngine::new(config.rules())),
            plan: Mutex::new(None),
            maps,
            config,
            positions,
            tx,
        };
        Ok((state, rx))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn engine(&self) -> MutexGuard<'_, RouteProgressEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn plan(&self) -> MutexGuard<'_, Option<RoutePlan>> {
        self.plan.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current snapshot.
    pub fn status(&self) -> RouteStatus {
        let view = self.engine().view();
        RouteStatus {
            view,
            plan: self.plan().clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RouteStatus> {
        self.tx.subscribe()
    }

    fn publish(&self) {
        // No subscribers is fine.
        let _ = self.tx.send(self.status());
    }

    /// Resolve a label for `coord`, then record the waypoint.
    ///
    /// Locked or full routes are rejected before the geocoder is called.
    pub async fn add_waypoint(&self, coord: Coordinate) -> Result<Waypoint, RouteError> {
        coord.validate()?;
        {
            let engine = self.engine();
            if engine.phase().route_requested() {
                return Err(RouteError::RouteLocked);
            }
            if engine.waypoints().len() >= engine.rules().max_waypoints {
                return Err(RouteError::CapacityExceeded {
                    max: engine.rules().max_waypoints,
                });
            }
        }

        let label = match &self.maps {
            Some(maps) => maps.reverse_geocode(&coord).await,
            None => Ok(offline_label(&coord)),
        };

        let waypoint = self.engine().add_resolved_waypoint(coord, label)?;
        self.publish();
        Ok(waypoint)
    }

    /// Start navigating and fetch the route geometry on a best-effort basis.
    ///
    /// The geometry is only stored if the route it was fetched for is still
    /// the current one once the provider answers.
    pub async fn request_route(
        &self,
        origin: Option<Coordinate>,
    ) -> Result<RouteStatus, RouteError> {
        if let Some(origin) = origin.as_ref() {
            origin.validate()?;
        }

        let (request, generation) = {
            let mut engine = self.engine();
            engine.request_route()?;
            (engine.route_request(origin), engine.route_generation())
        };

        let plan = match (&self.maps, request) {
            (Some(maps), Some(request)) => match maps.directions(&request).await {
                Ok(plan) => Some(plan),
                Err(e) => {
                    tracing::warn!("Failed to fetch directions: {:#}", e);
                    None
                }
            },
            (Some(_), None) => {
                tracing::debug!("No origin yet, skipping directions");
                None
            }
            (None, _) => None,
        };

        {
            let engine = self.engine();
            if engine.route_generation() == generation {
                *self.plan() = plan;
            } else {
                tracing::debug!("Route cleared while fetching directions, dropping plan");
            }
        }
        self.publish();
        Ok(self.status())
    }

    /// Queue a sample for the position loop; never waits.
    pub fn enqueue_position(&self, sample: PositionSample) -> Result<(), EnqueueError> {
        self.positions.try_send(sample).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => EnqueueError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => EnqueueError::Closed,
        })
    }

    /// Feed one sample to the engine. Only the position loop calls this in production.
    pub fn apply_position(&self, sample: PositionSample) -> Result<(), RouteError> {
        let prompt = self.engine().on_position_update(sample.coordinate)?;
        if let Some(prompt) = prompt {
            tracing::info!(
                "Prompt opened for '{}' at {:.0}m",
                prompt.waypoint.short_label(),
                prompt.distance_m
            );
        }
        self.publish();
        Ok(())
    }

    pub fn resolve_prompt(&self, accept: bool) -> Result<RoutePhase, RouteError> {
        let phase = self.engine().resolve_prompt(accept)?;
        self.publish();
        Ok(phase)
    }

    pub fn complete_waypoint(&self, id: WaypointId) -> Result<bool, RouteError> {
        let changed = self.engine().complete_waypoint(id)?;
        self.publish();
        Ok(changed)
    }

    pub fn clear_route(&self) {
        self.engine().clear_route();
        *self.plan() = None;
        self.publish();
    }

    pub fn toggle_tracking(&self) -> bool {
        let enabled = self.engine().toggle_tracking();
        self.publish();
        enabled
    }

    pub fn report_journey(&self) -> Result<JourneySummary, RouteError> {
        let summary = self.engine().report_journey_complete()?;
        *self.plan() = None;
        self.publish();
        Ok(summary)
    }
}
