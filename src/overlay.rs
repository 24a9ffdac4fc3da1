//! Weather overlay service
//!
//! The public entry point: decode and time the route, pick sample points,
//! fetch their weather and assemble the ordered result.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::WeatherRouteError;
use crate::assemble::{ResultAssembler, WeatherPointDisplay};
use crate::config::WeatherRouteConfig;
use crate::correlate::{CorrelationOptions, SampleSkip, WeatherCorrelator};
use crate::models::{Route, WeatherPoint};
use crate::providers::{DirectionsProvider, WeatherProvider};
use crate::sampling::{SamplePointSelector, SamplePolicy};
use crate::timeline::RouteTimeline;

/// Weather along a route, plus the samples that could not be filled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherOverlay {
    pub points: Vec<WeatherPoint>,
    pub display: Vec<WeatherPointDisplay>,
    pub skipped: Vec<SampleSkip>,
}

pub struct OverlayService {
    directions: Arc<dyn DirectionsProvider>,
    correlator: WeatherCorrelator,
    default_policy: SamplePolicy,
}

impl OverlayService {
    pub fn new(
        directions: Arc<dyn DirectionsProvider>,
        weather: Arc<dyn WeatherProvider>,
        options: CorrelationOptions,
        default_policy: SamplePolicy,
    ) -> Self {
        Self {
            directions,
            correlator: WeatherCorrelator::new(weather, options),
            default_policy,
        }
    }

    /// Build a service using the sampling and correlation settings from `config`
    pub fn from_config(
        config: &WeatherRouteConfig,
        directions: Arc<dyn DirectionsProvider>,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self::new(
            directions,
            weather,
            config.correlation_options(),
            config.sample_policy(),
        )
    }

    #[must_use]
    pub fn default_policy(&self) -> SamplePolicy {
        self.default_policy
    }

    /// Ask the directions provider for a driving route
    #[instrument(skip(self))]
    pub async fn get_route(&self, origin: &str, destination: &str) -> crate::Result<Route> {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            return Err(WeatherRouteError::validation(
                "Origin and destination cannot be empty",
            ));
        }

        let route = self
            .directions
            .route(origin.trim(), destination.trim())
            .await
            .with_context(|| format!("Unable to get directions from '{origin}' to '{destination}'"))
            .map_err(|e| WeatherRouteError::api(format!("{e:#}")))?;

        route.ensure_not_empty()?;
        info!(
            "Route with {} legs, {}s total",
            route.legs.len(),
            route.total_duration_seconds()
        );
        Ok(route)
    }

    /// Weather along `route` for a traveler leaving at `departure` (now if absent)
    pub async fn get_weather_overlay(
        &self,
        route: &Route,
        departure: Option<DateTime<Utc>>,
        policy: &SamplePolicy,
    ) -> crate::Result<WeatherOverlay> {
        self.get_weather_overlay_at(route, departure, policy, Utc::now())
            .await
    }

    /// Same as [`Self::get_weather_overlay`] with an explicit "now", which
    /// anchors both the default departure and the forecast horizon
    #[instrument(name = "weather_overlay", skip(self, route, policy))]
    pub async fn get_weather_overlay_at(
        &self,
        route: &Route,
        departure: Option<DateTime<Utc>>,
        policy: &SamplePolicy,
        now: DateTime<Utc>,
    ) -> crate::Result<WeatherOverlay> {
        let departure = departure.unwrap_or(now);

        let timeline = RouteTimeline::annotate(route, departure)?;
        let samples = SamplePointSelector::select(&timeline, policy);
        debug!(
            "Sampling {} of {} route points",
            samples.len(),
            timeline.len()
        );

        let report = self.correlator.correlate(&samples, now).await;
        let points = ResultAssembler::assemble(report.points);
        let display = ResultAssembler::display(&points);

        info!(
            "Weather overlay ready: {} points, {} skipped",
            points.len(),
            report.skipped.len()
        );
        Ok(WeatherOverlay {
            points,
            display,
            skipped: report.skipped,
        })
    }
}
