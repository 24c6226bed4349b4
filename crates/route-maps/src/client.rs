//! Maps web service HTTP client.

use anyhow::{Context, Result};
use reqwest::Client;
use route_core::{Coordinate, RoutePlan, RouteRequest};
use std::time::Duration;

use crate::directions::{self, DirectionsResponse};
use crate::geocode::{self, GeocodeResponse};

/// HTTP client for the geocoding and directions APIs.
pub struct MapsClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
}

impl MapsClient {
    /// Create a new maps client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the maps service (e.g., "https://maps.googleapis.com")
    /// * `api_key` - API key sent with every request
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .context("Failed to create HTTP client")?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Resolve a human-readable street address for a coordinate.
    pub async fn reverse_geocode(&self, coord: &Coordinate) -> Result<String> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("latlng", coord.to_string()), ("key", self.api_key.clone())])
            .send()
            .await
            .context("Failed to send geocode request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Geocode request failed: {} {}", status, body));
        }

        let payload = response
            .json::<GeocodeResponse>()
            .await
            .context("Failed to parse geocode response")?;

        let label = geocode::label_from_response(payload)?;
        tracing::debug!("Geocoded {} -> {}", coord, label);
        Ok(label)
    }

    /// Fetch an optimized driving route for the given request.
    pub async fn directions(&self, request: &RouteRequest) -> Result<RoutePlan> {
        let url = format!("{}/maps/api/directions/json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&directions::query_params(request, &self.api_key))
            .send()
            .await
            .context("Failed to send directions request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Directions request failed: {} {}", status, body));
        }

        let payload = response
            .json::<DirectionsResponse>()
            .await
            .context("Failed to parse directions response")?;

        let plan = directions::plan_from_response(payload)?;
        tracing::debug!(
            "Route through {} stop(s): {:.0}m, {:.0}s",
            request.waypoints.len() + 1,
            plan.distance_m,
            plan.duration_s
        );
        Ok(plan)
    }
}
