//! Result assembly and render-ready display records

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::WeatherPoint;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

pub struct ResultAssembler;

impl ResultAssembler {
    /// Drop exact (coordinate, time) duplicates, keeping the first, then order
    /// by time. The sort is stable, so ties keep traversal order.
    #[must_use]
    pub fn assemble(weather_points: Vec<WeatherPoint>) -> Vec<WeatherPoint> {
        let total = weather_points.len();
        let mut seen = HashSet::with_capacity(total);
        let mut points: Vec<WeatherPoint> = weather_points
            .into_iter()
            .filter(|p| seen.insert((p.coordinate.bits(), p.time)))
            .collect();
        points.sort_by_key(|p| p.time);

        if points.len() < total {
            debug!("Dropped {} duplicate weather points", total - points.len());
        }
        points
    }

    /// One display record per point, in the same order
    #[must_use]
    pub fn display(points: &[WeatherPoint]) -> Vec<WeatherPointDisplay> {
        points.iter().map(WeatherPointDisplay::from).collect()
    }
}

/// Everything a map marker and its popup need, computed up front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherPointDisplay {
    pub latitude: f64,
    pub longitude: f64,
    pub time: DateTime<Utc>,
    pub icon_url: String,
    pub title: String,
    pub temperature_text: String,
    pub precip_text: String,
}

impl From<&WeatherPoint> for WeatherPointDisplay {
    fn from(point: &WeatherPoint) -> Self {
        Self {
            latitude: point.coordinate.latitude(),
            longitude: point.coordinate.longitude(),
            time: point.time,
            icon_url: format!("{ICON_BASE_URL}/{}.png", point.weather_data.weather_icon_id),
            title: point.time.format("%a %b %-d, %H:%M UTC").to_string(),
            temperature_text: format!("Temperature: {}", point.format_temperature()),
            precip_text: format!("Chance of Precip: {}%", point.precip_percent()),
        }
    }
}
