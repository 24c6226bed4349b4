//! Drive path implementations.

use anyhow::{bail, Context, Result};
use route_core::{haversine_distance, Coordinate};

/// One straight leg of a drive.
#[derive(Debug, Clone)]
struct Leg {
    start: Coordinate,
    end: Coordinate,
    start_time: f64,
    duration: f64,
}

/// Piecewise-linear drive from a start point through each stop at constant speed.
#[derive(Debug, Clone)]
pub struct DrivePath {
    legs: Vec<Leg>,
    pub speed_mps: f64,
    pub distance_m: f64,
    pub duration: f64,
}

impl DrivePath {
    /// Create a drive visiting `stops` in order.
    pub fn new(start: Coordinate, stops: &[Coordinate], speed_mps: f64) -> Self {
        let mut legs = Vec::with_capacity(stops.len());
        let mut from = start;
        let mut elapsed = 0.0;
        let mut distance_m = 0.0;

        for stop in stops {
            let leg_m =
                haversine_distance(from.latitude, from.longitude, stop.latitude, stop.longitude);
            let duration = if speed_mps > 0.0 { leg_m / speed_mps } else { 0.0 };
            legs.push(Leg {
                start: from,
                end: *stop,
                start_time: elapsed,
                duration,
            });
            elapsed += duration;
            distance_m += leg_m;
            from = *stop;
        }

        Self {
            legs,
            speed_mps,
            distance_m,
            duration: elapsed,
        }
    }

    /// Position at time t seconds from start, clamped to the ends of the drive.
    pub fn get_position(&self, t: f64) -> Option<Coordinate> {
        let leg = self
            .legs
            .iter()
            .find(|leg| t < leg.start_time + leg.duration)
            .or_else(|| self.legs.last())?;

        // Clamp progress to [0, 1]
        let progress = if leg.duration > 0.0 {
            ((t - leg.start_time) / leg.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        Some(Coordinate {
            latitude: leg.start.latitude + progress * (leg.end.latitude - leg.start.latitude),
            longitude: leg.start.longitude + progress * (leg.end.longitude - leg.start.longitude),
        })
    }
}

/// Parse "LAT,LON" into a coordinate.
pub fn parse_coordinate(s: &str) -> Result<Coordinate> {
    let Some((lat, lon)) = s.split_once(',') else {
        bail!("expected LAT,LON, got '{}'", s);
    };
    let lat: f64 = lat.trim().parse().context("invalid latitude")?;
    let lon: f64 = lon.trim().parse().context("invalid longitude")?;
    Ok(Coordinate::new(lat, lon)?)
}
