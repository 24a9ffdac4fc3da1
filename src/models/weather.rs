//! Weather observation model and the time-annotated points it attaches to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;

/// A point on the route with the instant the traveler is expected there
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimedPoint {
    pub coordinate: Coordinate,
    pub arrival_time: DateTime<Utc>,
}

impl TimedPoint {
    #[must_use]
    pub fn new(coordinate: Coordinate, arrival_time: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            arrival_time,
        }
    }
}

/// Forecast conditions for one place and time, passed through untouched
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    /// Temperature in the provider's configured units
    pub temperature: f64,
    /// Probability of precipitation, 0.0 to 1.0
    pub precip_chance: f64,
    /// Provider icon identifier, e.g. `10d`
    pub weather_icon_id: String,
}

/// Final output unit: a route sample with its weather
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherPoint {
    pub coordinate: Coordinate,
    pub time: DateTime<Utc>,
    pub weather_data: WeatherObservation,
}

impl WeatherPoint {
    #[must_use]
    pub fn new(point: &TimedPoint, weather_data: WeatherObservation) -> Self {
        Self {
            coordinate: point.coordinate,
            time: point.arrival_time,
            weather_data,
        }
    }

    /// Format temperature with one decimal
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°", self.weather_data.temperature)
    }

    /// Precipitation chance as a whole percentage
    #[must_use]
    pub fn precip_percent(&self) -> u8 {
        (self.weather_data.precip_chance.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}
