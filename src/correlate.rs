//! Weather correlation
//!
//! Pairs each sample point with the forecast valid at its place and arrival
//! time. Lookups run concurrently up to a cap, each under its own timeout.
//! A failed, timed-out or too-distant lookup drops only that sample.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::models::{Coordinate, TimedPoint, WeatherPoint};
use crate::providers::WeatherProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationOptions {
    /// Samples further than this past "now" are not queried
    pub forecast_horizon: Duration,
    pub lookup_timeout: Duration,
    pub max_concurrent_lookups: usize,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            forecast_horizon: Duration::from_secs(24 * 60 * 60),
            lookup_timeout: Duration::from_secs(10),
            max_concurrent_lookups: 8,
        }
    }
}

/// Why a sample has no weather attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SkipReason {
    ForecastHorizonExceeded,
    WeatherLookupFailed { message: String },
}

/// A sample dropped from the output, surfaced as a partial-result warning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSkip {
    pub coordinate: Coordinate,
    pub time: DateTime<Utc>,
    pub reason: SkipReason,
}

impl SampleSkip {
    fn new(point: &TimedPoint, reason: SkipReason) -> Self {
        Self {
            coordinate: point.coordinate,
            time: point.arrival_time,
            reason,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationReport {
    /// Successful samples, in input order
    pub points: Vec<WeatherPoint>,
    /// Dropped samples, in input order
    pub skipped: Vec<SampleSkip>,
}

pub struct WeatherCorrelator {
    provider: Arc<dyn WeatherProvider>,
    options: CorrelationOptions,
}

impl WeatherCorrelator {
    pub fn new(provider: Arc<dyn WeatherProvider>, options: CorrelationOptions) -> Self {
        Self { provider, options }
    }

    /// Look up weather for every point; `now` anchors the forecast horizon.
    ///
    /// Returns once every lookup has finished, failed or timed out.
    #[instrument(name = "correlate_weather", skip(self, points), fields(samples = points.len()))]
    pub async fn correlate(&self, points: &[TimedPoint], now: DateTime<Utc>) -> CorrelationReport {
        let outcomes: Vec<Result<WeatherPoint, SampleSkip>> = stream::iter(points.iter().copied())
            .map(|point| self.lookup_one(point, now))
            .buffered(self.options.max_concurrent_lookups.max(1))
            .collect()
            .await;

        let mut report = CorrelationReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(point) => report.points.push(point),
                Err(skip) => report.skipped.push(skip),
            }
        }

        debug!(
            "Correlated {} samples, {} skipped",
            report.points.len(),
            report.skipped.len()
        );
        report
    }

    async fn lookup_one(
        &self,
        point: TimedPoint,
        now: DateTime<Utc>,
    ) -> Result<WeatherPoint, SampleSkip> {
        let horizon = TimeDelta::from_std(self.options.forecast_horizon).unwrap_or(TimeDelta::MAX);
        if point.arrival_time - now > horizon {
            debug!(
                "Skipping {} at {}: beyond forecast horizon",
                point.coordinate.format_coordinates(),
                point.arrival_time.to_rfc3339()
            );
            return Err(SampleSkip::new(&point, SkipReason::ForecastHorizonExceeded));
        }

        let lookup = self.provider.lookup(point.coordinate, point.arrival_time);
        match tokio::time::timeout(self.options.lookup_timeout, lookup).await {
            Ok(Ok(observation)) => Ok(WeatherPoint::new(&point, observation)),
            Ok(Err(e)) => {
                warn!(
                    "Failed to fetch weather for {}: {:#}",
                    point.coordinate.format_coordinates(),
                    e
                );
                Err(SampleSkip::new(
                    &point,
                    SkipReason::WeatherLookupFailed {
                        message: format!("{e:#}"),
                    },
                ))
            }
            Err(_) => {
                warn!(
                    "Weather lookup for {} timed out after {:?}",
                    point.coordinate.format_coordinates(),
                    self.options.lookup_timeout
                );
                Err(SampleSkip::new(
                    &point,
                    SkipReason::WeatherLookupFailed {
                        message: format!(
                            "lookup timed out after {}s",
                            self.options.lookup_timeout.as_secs()
                        ),
                    },
                ))
            }
        }
    }
}
