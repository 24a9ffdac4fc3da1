//! Route model as produced by a directions provider

use serde::{Deserialize, Serialize};

use super::coordinate::{Bounds, Coordinate, Path};
use crate::{WeatherRouteError, polyline};

/// Polyline-encoded geometry, decoded lazily into a [`Path`]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct EncodedPath(pub String);

impl EncodedPath {
    /// Encode a path with the default 5-decimal precision
    #[must_use]
    pub fn from_path(path: &[Coordinate]) -> Self {
        Self(polyline::encode(path))
    }

    /// Decode into coordinates. An empty string decodes to an empty path.
    pub fn decode(&self) -> crate::Result<Path> {
        polyline::decode(&self.0)
    }
}

impl From<&str> for EncodedPath {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A unit of travel with roughly constant conditions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub polyline: EncodedPath,
    pub duration_seconds: u64,
    pub start_location: Coordinate,
    pub end_location: Coordinate,
    /// Finer-grained steps; when present they replace this step's own
    /// geometry and duration while walking the route
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_steps: Vec<Step>,
}

impl Step {
    /// Steps actually travelled, in order: the sub-steps if any, else the step itself
    pub fn travel_units<'a>(&'a self, out: &mut Vec<&'a Step>) {
        if self.sub_steps.is_empty() {
            out.push(self);
        } else {
            for sub in &self.sub_steps {
                sub.travel_units(out);
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub steps: Vec<Step>,
    pub start_location: Coordinate,
    pub end_location: Coordinate,
}

/// A driving route, read-only input to the overlay pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub overview_polyline: EncodedPath,
    #[serde(default)]
    pub bounds: Option<Bounds>,
}

impl Route {
    /// Every travelled step across all legs, in traversal order
    #[must_use]
    pub fn travel_units(&self) -> Vec<&Step> {
        let mut units = Vec::new();
        for leg in &self.legs {
            for step in &leg.steps {
                step.travel_units(&mut units);
            }
        }
        units
    }

    /// Sum of all travelled step durations
    #[must_use]
    pub fn total_duration_seconds(&self) -> u64 {
        self.travel_units()
            .iter()
            .map(|s| s.duration_seconds)
            .sum()
    }

    /// Fails with [`WeatherRouteError::EmptyRoute`] when there is nothing to walk
    pub fn ensure_not_empty(&self) -> crate::Result<()> {
        if self.legs.is_empty() || self.legs.iter().all(|leg| leg.steps.is_empty()) {
            return Err(WeatherRouteError::EmptyRoute);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn step(duration_seconds: u64) -> Step {
        Step {
            polyline: EncodedPath::from_path(&[coord(1.0, 1.0), coord(1.1, 1.1)]),
            duration_seconds,
            start_location: coord(1.0, 1.0),
            end_location: coord(1.1, 1.1),
            sub_steps: Vec::new(),
        }
    }

    fn leg(steps: Vec<Step>) -> Leg {
        Leg {
            steps,
            start_location: coord(1.0, 1.0),
            end_location: coord(1.1, 1.1),
        }
    }

    #[test]
    fn test_sub_steps_replace_parent() {
        let mut parent = step(1000);
        parent.sub_steps = vec![step(300), step(400)];
        let route = Route {
            legs: vec![leg(vec![step(60), parent])],
            overview_polyline: EncodedPath::default(),
            bounds: None,
        };

        let durations: Vec<u64> = route
            .travel_units()
            .iter()
            .map(|s| s.duration_seconds)
            .collect();
        assert_eq!(durations, vec![60, 300, 400]);
        assert_eq!(route.total_duration_seconds(), 760);
    }

    #[test]
    fn test_empty_route_detection() {
        let no_legs = Route {
            legs: vec![],
            overview_polyline: EncodedPath::default(),
            bounds: None,
        };
        assert!(matches!(
            no_legs.ensure_not_empty(),
            Err(WeatherRouteError::EmptyRoute)
        ));

        let no_steps = Route {
            legs: vec![leg(vec![]), leg(vec![])],
            overview_polyline: EncodedPath::default(),
            bounds: None,
        };
        assert!(no_steps.ensure_not_empty().is_err());

        let ok = Route {
            legs: vec![leg(vec![]), leg(vec![step(10)])],
            overview_polyline: EncodedPath::default(),
            bounds: None,
        };
        assert!(ok.ensure_not_empty().is_ok());
    }

    #[test]
    fn test_route_json_uses_camel_case() {
        let route = Route {
            legs: vec![leg(vec![step(42)])],
            overview_polyline: EncodedPath::from("_p~iF~ps|U"),
            bounds: None,
        };
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["legs"][0]["steps"][0]["durationSeconds"], 42);
        assert_eq!(json["overviewPolyline"], "_p~iF~ps|U");
        assert!(json["legs"][0]["steps"][0].get("subSteps").is_none());
    }
}
