//! Coordinate model for geographic positions

use serde::{Deserialize, Serialize};

use crate::WeatherRouteError;

/// Ordered sequence of coordinates; index order is traversal order.
pub type Path = Vec<Coordinate>;

/// A validated WGS84 position.
///
/// Serialized as `{"lat": .., "lng": ..}`, the shape map front-ends consume.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    /// Latitude in decimal degrees
    #[serde(rename = "lat")]
    latitude: f64,
    /// Longitude in decimal degrees
    #[serde(rename = "lng")]
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = WeatherRouteError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherRouteError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherRouteError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Format coordinate as `lat, lng` with four decimals
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Exact bit pattern, usable as a hash key for duplicate detection
    #[must_use]
    pub fn bits(&self) -> (u64, u64) {
        (self.latitude.to_bits(), self.longitude.to_bits())
    }
}

/// Rectangular extent of a route
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub northeast: Coordinate,
    pub southwest: Coordinate,
}

impl Bounds {
    /// Smallest bounds containing every coordinate of `path`
    #[must_use]
    pub fn around(path: &[Coordinate]) -> Option<Self> {
        let first = path.first()?;
        let (mut north, mut south) = (first.latitude, first.latitude);
        let (mut east, mut west) = (first.longitude, first.longitude);
        for c in &path[1..] {
            north = north.max(c.latitude);
            south = south.min(c.latitude);
            east = east.max(c.longitude);
            west = west.min(c.longitude);
        }
        Some(Self {
            northeast: Coordinate {
                latitude: north,
                longitude: east,
            },
            southwest: Coordinate {
                latitude: south,
                longitude: west,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(91.0, 0.0)]
    #[case(-90.5, 0.0)]
    #[case(0.0, 180.1)]
    #[case(0.0, -181.0)]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    fn test_invalid_coordinates_rejected(#[case] lat: f64, #[case] lng: f64) {
        assert!(Coordinate::new(lat, lng).is_err());
    }

    #[test]
    fn test_coordinate_json_shape() {
        let c = Coordinate::new(38.5, -120.2).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"lat":38.5,"lng":-120.2}"#);

        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let result: Result<Coordinate, _> = serde_json::from_str(r#"{"lat":120.0,"lng":0.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_bounds_around_path() {
        let path = vec![
            Coordinate::new(38.5, -120.2).unwrap(),
            Coordinate::new(40.7, -120.95).unwrap(),
            Coordinate::new(43.252, -126.453).unwrap(),
        ];
        let bounds = Bounds::around(&path).unwrap();
        assert_eq!(bounds.northeast, Coordinate::new(43.252, -120.2).unwrap());
        assert_eq!(bounds.southwest, Coordinate::new(38.5, -126.453).unwrap());
        assert!(Bounds::around(&[]).is_none());
    }
}
