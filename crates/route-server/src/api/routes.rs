//! REST API routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use route_core::{Coordinate, JourneySummary, PositionSample, RoutePhase, Waypoint, WaypointId};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::{ws, ApiError};
use crate::state::{AppState, EnqueueError, RouteStatus};

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/route", get(get_route))
        .route("/v1/route/request", post(request_route))
        .route("/v1/route/clear", post(clear_route))
        .route("/v1/route/report", post(report_journey))
        .route("/v1/waypoints", post(add_waypoint))
        .route("/v1/waypoints/:id/complete", post(complete_waypoint))
        .route("/v1/prompt/resolve", post(resolve_prompt))
        .route("/v1/tracking/toggle", post(toggle_tracking))
        .route("/v1/positions", post(receive_position))
        .route("/v1/ws", get(ws::ws_handler))
}

#[derive(Debug, Deserialize)]
pub struct RouteRequestBody {
    #[serde(default)]
    pub origin: Option<Coordinate>,
}

#[derive(Debug, Deserialize)]
pub struct ResolvePromptBody {
    pub accept: bool,
}

async fn get_route(State(state): State<Arc<AppState>>) -> Json<RouteStatus> {
    Json(state.status())
}

async fn add_waypoint(
    State(state): State<Arc<AppState>>,
    Json(coord): Json<Coordinate>,
) -> Result<(StatusCode, Json<Waypoint>), ApiError> {
    let waypoint = state.add_waypoint(coord).await?;
    Ok((StatusCode::CREATED, Json(waypoint)))
}

async fn complete_waypoint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<WaypointId>,
) -> Result<Json<RouteStatus>, ApiError> {
    state.complete_waypoint(id)?;
    Ok(Json(state.status()))
}

/// The body is optional; a request without a JSON body starts from the
/// current position, but a malformed one is rejected.
async fn request_route(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RouteRequestBody>, JsonRejection>,
) -> Response {
    let origin = match body {
        Ok(Json(body)) => body.origin,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return rejection.into_response(),
    };

    match state.request_route(origin).await {
        Ok(status) => Json(status).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn clear_route(State(state): State<Arc<AppState>>) -> Json<RouteStatus> {
    state.clear_route();
    Json(state.status())
}

async fn report_journey(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JourneySummary>, ApiError> {
    Ok(Json(state.report_journey()?))
}

async fn resolve_prompt(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResolvePromptBody>,
) -> Result<Json<RouteStatus>, ApiError> {
    let phase = state.resolve_prompt(body.accept)?;
    if matches!(phase, RoutePhase::Finished { .. }) {
        tracing::info!("All items delivered");
    }
    Ok(Json(state.status()))
}

async fn toggle_tracking(State(state): State<Arc<AppState>>) -> Json<RouteStatus> {
    state.toggle_tracking();
    Json(state.status())
}

async fn receive_position(
    State(state): State<Arc<AppState>>,
    Json(coord): Json<Coordinate>,
) -> Result<impl IntoResponse, ApiError> {
    coord.validate()?;

    let response = match state.enqueue_position(PositionSample::now(coord)) {
        Ok(()) => (StatusCode::ACCEPTED, Json(json!({ "queued": true }))),
        Err(EnqueueError::QueueFull) => {
            tracing::debug!("Position queue full, dropping sample {}", coord);
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "queued": false, "error": "position_dropped" })),
            )
        }
        Err(EnqueueError::Closed) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "queued": false, "error": "position_loop_stopped" })),
        ),
    };
    Ok(response)
}
