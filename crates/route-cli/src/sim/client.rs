//! HTTP client for the route server API.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use route_core::{Coordinate, JourneySummary, RouteView, Waypoint};
use serde_json::json;

/// Blocking client used by the drive simulator.
pub struct RouteClient {
    client: Client,
    base_url: String,
}

impl RouteClient {
    /// Create a new route client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the route server (e.g., "http://localhost:3000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Plot a stop; the server resolves its label.
    pub fn add_waypoint(&self, coord: &Coordinate) -> Result<Waypoint> {
        let response = self
            .client
            .post(format!("{}/v1/waypoints", self.base_url))
            .json(coord)
            .send()
            .context("Failed to add waypoint")?;
        parse(response, "add waypoint")
    }

    /// Request the optimized route starting from `origin`.
    pub fn request_route(&self, origin: &Coordinate) -> Result<RouteView> {
        let response = self
            .client
            .post(format!("{}/v1/route/request", self.base_url))
            .json(&json!({ "origin": origin }))
            .send()
            .context("Failed to request route")?;
        parse(response, "request route")
    }

    /// Send one position sample.
    ///
    /// # Returns
    /// HTTP status code (202 queued, 429 dropped)
    pub fn send_position(&self, coord: &Coordinate) -> Result<u16> {
        let response = self
            .client
            .post(format!("{}/v1/positions", self.base_url))
            .json(coord)
            .send()
            .context("Failed to send position")?;
        Ok(response.status().as_u16())
    }

    pub fn route(&self) -> Result<RouteView> {
        let response = self
            .client
            .get(format!("{}/v1/route", self.base_url))
            .send()
            .context("Failed to fetch route")?;
        parse(response, "fetch route")
    }

    pub fn resolve_prompt(&self, accept: bool) -> Result<RouteView> {
        let response = self
            .client
            .post(format!("{}/v1/prompt/resolve", self.base_url))
            .json(&json!({ "accept": accept }))
            .send()
            .context("Failed to resolve prompt")?;
        parse(response, "resolve prompt")
    }

    pub fn clear_route(&self) -> Result<RouteView> {
        let response = self
            .client
            .post(format!("{}/v1/route/clear", self.base_url))
            .send()
            .context("Failed to clear route")?;
        parse(response, "clear route")
    }

    pub fn report_journey(&self) -> Result<JourneySummary> {
        let response = self
            .client
            .post(format!("{}/v1/route/report", self.base_url))
            .send()
            .context("Failed to report journey")?;
        parse(response, "report journey")
    }
}

fn parse<T: serde::de::DeserializeOwned>(response: Response, action: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        anyhow::bail!("Failed to {}: {} {}", action, status, body);
    }
    response
        .json()
        .with_context(|| format!("Failed to parse {} response", action))
}
