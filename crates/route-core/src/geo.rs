//! Spatial math for waypoint proximity and distance calculations.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// Longitude -180 is stored as 180 so the antimeridian has one representation.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, RouteError> {
        let longitude = if longitude == -180.0 { 180.0 } else { longitude };
        let coord = Self { latitude, longitude };
        coord.validate()?;
        Ok(coord)
    }

    /// Check that both components are finite and inside the WGS84 ranges.
    pub fn validate(&self) -> Result<(), RouteError> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(RouteError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates in meters.
///
/// Fails only when either input is not a valid coordinate.
pub fn distance_m(a: &Coordinate, b: &Coordinate) -> Result<f64, RouteError> {
    a.validate()?;
    b.validate()?;
    Ok(haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude))
}

/// Calculate distance between two points in meters (Haversine formula).
///
/// The deltas are taken as absolute values so that swapping the arguments
/// yields a bit-identical result. The square root of the haversine term is
/// built with `hypot`, so deltas far below a millimetre still give a non-zero
/// distance. Only deltas lost in the degree-to-radian conversion itself
/// (subnormal floats) collapse to zero.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).abs().to_radians();
    let dlambda = (lon2 - lon1).abs().to_radians();
    let h = (dphi / 2.0)
        .sin()
        .hypot((phi1.cos() * phi2.cos()).sqrt() * (dlambda / 2.0).sin())
        .min(1.0);
    2.0 * EARTH_RADIUS_M * h.atan2((1.0 - h * h).max(0.0).sqrt())
}

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Move a coordinate by a north/east offset in meters.
pub fn offset_by_meters(origin: &Coordinate, north_m: f64, east_m: f64) -> Coordinate {
    Coordinate {
        latitude: origin.latitude + north_m / meters_per_deg_lat(origin.latitude),
        longitude: origin.longitude + east_m / meters_per_deg_lon(origin.latitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let a = Coordinate::new(33.6846, -117.8265).unwrap();
        assert_eq!(distance_m(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            ((10.0, 10.0), (20.0, 20.0)),
            ((-33.8688, 151.2093), (51.5074, -0.1278)),
            ((89.9, 179.9), (-89.9, -179.9)),
            ((33.6846, -117.8265), (33.6850, -117.8270)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let a = Coordinate::new(lat1, lon1).unwrap();
            let b = Coordinate::new(lat2, lon2).unwrap();
            assert_eq!(distance_m(&a, &b).unwrap(), distance_m(&b, &a).unwrap());
            assert!(distance_m(&a, &b).unwrap() > 0.0);
        }
    }

    #[test]
    fn tiny_separation_is_not_zero() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(0.0, 1e-200).unwrap();
        assert_ne!(a, b);
        assert!(distance_m(&a, &b).unwrap() > 0.0);
        assert_eq!(distance_m(&a, &b).unwrap(), distance_m(&b, &a).unwrap());
    }

    #[test]
    fn antimeridian_has_one_representation() {
        let east = Coordinate::new(10.0, 180.0).unwrap();
        let west = Coordinate::new(10.0, -180.0).unwrap();
        assert_eq!(east, west);
        assert_eq!(distance_m(&east, &west).unwrap(), 0.0);
    }

    #[test]
    fn rejects_non_finite_inputs() {
        let good = Coordinate::new(10.0, 10.0).unwrap();
        let bad = Coordinate {
            latitude: f64::NAN,
            longitude: 10.0,
        };
        assert!(matches!(
            distance_m(&good, &bad),
            Err(RouteError::InvalidCoordinate { .. })
        ));
        assert!(Coordinate::new(10.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(91.0, 0.0).is_err());
    }

    #[test]
    fn offset_by_meters_round_trips_distance() {
        let origin = Coordinate::new(10.0, 10.0).unwrap();
        let moved = offset_by_meters(&origin, 50.0, 0.0);
        let dist = distance_m(&origin, &moved).unwrap();
        assert!((dist - 50.0).abs() < 0.5, "expected ~50m, got {dist}");
    }
}
