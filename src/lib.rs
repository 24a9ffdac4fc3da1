//! `weather-route` - forecast weather along a driving route
//!
//! Decodes a route's geometry, estimates when the traveler reaches each
//! point, samples a bounded set of those points and pairs every sample with
//! the forecast valid at that place and time.

pub mod api;
pub mod assemble;
pub mod config;
pub mod correlate;
pub mod error;
pub mod geo;
pub mod logging;
pub mod models;
pub mod overlay;
pub mod polyline;
pub mod providers;
pub mod sampling;
pub mod timeline;
pub mod web;

// Re-export core types for public API
pub use assemble::{ResultAssembler, WeatherPointDisplay};
pub use config::WeatherRouteConfig;
pub use correlate::{CorrelationOptions, CorrelationReport, SampleSkip, SkipReason, WeatherCorrelator};
pub use error::WeatherRouteError;
pub use models::{Coordinate, EncodedPath, Leg, Route, Step, TimedPoint, WeatherObservation, WeatherPoint};
pub use overlay::{OverlayService, WeatherOverlay};
pub use providers::{DirectionsProvider, PlacesProvider, WeatherProvider};
pub use sampling::{SamplePointSelector, SamplePolicy, Spacing};
pub use timeline::RouteTimeline;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherRouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
