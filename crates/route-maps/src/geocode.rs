//! Reverse geocoding responses.

use anyhow::{bail, Result};
use route_core::Coordinate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
}

/// Pick the street address out of a geocode response.
///
/// Anything other than an `OK` status with at least one non-blank address is an error.
pub fn label_from_response(response: GeocodeResponse) -> Result<String> {
    if response.status != "OK" {
        bail!(
            "geocoder returned {}{}",
            response.status,
            response
                .error_message
                .map(|m| format!(": {m}"))
                .unwrap_or_default()
        );
    }

    match response.results.into_iter().next() {
        Some(result) if !result.formatted_address.trim().is_empty() => Ok(result.formatted_address),
        _ => bail!("geocoder returned no address"),
    }
}

/// Label used when no geocoding provider is configured.
pub fn offline_label(coord: &Coordinate) -> String {
    format!("{:.5} {:.5}", coord.latitude, coord.longitude)
}
