//! External collaborators the overlay pipeline depends on
//!
//! All capabilities are injected as trait objects so the pipeline can run
//! against live HTTP services or deterministic fakes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Coordinate, Route, WeatherObservation};

pub mod google_directions;
pub mod google_places;
pub mod http;
pub mod openweather;

pub use google_directions::GoogleDirectionsProvider;
pub use google_places::GooglePlacesProvider;
pub use openweather::OpenWeatherProvider;

/// Turns an origin/destination pair into a driving route
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(&self, origin: &str, destination: &str) -> Result<Route>;
}

/// Looks up the forecast valid at a place and time
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn lookup(&self, coordinate: Coordinate, time: DateTime<Utc>) -> Result<WeatherObservation>;
}

/// Completes a partially typed address into full place descriptions
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn suggest(&self, input: &str) -> Result<Vec<String>>;
}
