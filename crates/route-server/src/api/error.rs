//! Mapping of engine errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use route_core::RouteError;
use serde_json::json;

/// A rejected engine call, rendered as `{ "error": kind, "message": text }`.
#[derive(Debug)]
pub struct ApiError(pub RouteError);

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            RouteError::CapacityExceeded { .. }
            | RouteError::RouteLocked
            | RouteError::NoWaypoints
            | RouteError::NoPromptOpen
            | RouteError::RouteNotFinished => StatusCode::CONFLICT,
            RouteError::UnknownWaypoint(_) => StatusCode::NOT_FOUND,
            RouteError::InvalidCoordinate { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RouteError::LabelResolutionFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("{}", self.0);
        } else {
            tracing::debug!("Rejected request: {}", self.0);
        }
        (
            status,
            Json(json!({
                "error": self.0.kind(),
                "message": self.0.to_string(),
            })),
        )
            .into_response()
    }
}
