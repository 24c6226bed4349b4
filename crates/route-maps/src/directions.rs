//! Directions API request parameters and responses.

use anyhow::{bail, Result};
use route_core::{RoutePlan, RouteRequest};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
    pub overview_polyline: EncodedPolyline,
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsLeg {
    pub distance: TextValue,
    pub duration: TextValue,
}

#[derive(Debug, Deserialize)]
pub struct TextValue {
    pub value: f64,
}

/// Query parameters for a driving route through every stop of `request`.
pub fn query_params(request: &RouteRequest, api_key: &str) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("origin", request.origin.to_string()),
        ("destination", request.destination.to_string()),
        ("mode", "driving".to_string()),
    ];

    if !request.waypoints.is_empty() {
        let mut stops: Vec<String> = request.waypoints.iter().map(|c| c.to_string()).collect();
        if request.optimize {
            stops.insert(0, "optimize:true".to_string());
        }
        params.push(("waypoints", stops.join("|")));
    }

    params.push(("key", api_key.to_string()));
    params
}

/// Reduce a directions response to the first route's plan.
pub fn plan_from_response(response: DirectionsResponse) -> Result<RoutePlan> {
    if response.status != "OK" {
        bail!(
            "directions returned {}{}",
            response.status,
            response
                .error_message
                .map(|m| format!(": {m}"))
                .unwrap_or_default()
        );
    }

    let Some(route) = response.routes.into_iter().next() else {
        bail!("directions returned no routes");
    };

    Ok(RoutePlan {
        waypoint_order: route.waypoint_order,
        overview_polyline: route.overview_polyline.points,
        distance_m: route.legs.iter().map(|leg| leg.distance.value).sum(),
        duration_s: route.legs.iter().map(|leg| leg.duration.value).sum(),
    })
}
