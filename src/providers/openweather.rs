//! OpenWeatherMap One Call API client
//!
//! Fetches the hourly forecast for a coordinate and picks the hour that
//! contains the requested time.

use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::WeatherProvider;
use super::http::{redact_key, retrying_client};
use crate::config::WeatherConfig;
use crate::models::{Coordinate, WeatherObservation};

pub struct OpenWeatherProvider {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    units: String,
}

impl OpenWeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .context("Missing weather API key")?;
        let client = retrying_client(
            Duration::from_secs(u64::from(config.timeout_seconds)),
            config.max_retries,
        )?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
        })
    }

    fn onecall_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/onecall?units={}&lat={}&lon={}&exclude=current,minutely,daily,alerts&appid={}",
            self.base_url,
            self.units,
            coordinate.latitude(),
            coordinate.longitude(),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, coordinate), fields(coordinate = %coordinate.format_coordinates()))]
    async fn lookup(&self, coordinate: Coordinate, time: DateTime<Utc>) -> Result<WeatherObservation> {
        let start = Instant::now();
        let url = self.onecall_url(coordinate);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Weather request failed: {}", redact_key(&url, &self.api_key)))?
            .error_for_status()
            .context("Weather API returned an error status")?;

        let forecast: OneCallResponse = response
            .json()
            .await
            .context("Failed to parse weather response")?;

        let observation = forecast.observation_at(time)?;
        debug!("Weather fetched in {:?}", start.elapsed());
        Ok(observation)
    }
}

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    #[serde(default)]
    hourly: Vec<HourlyForecast>,
}

#[derive(Debug, Deserialize)]
struct HourlyForecast {
    /// Start of the hour, unix seconds
    dt: i64,
    temp: f64,
    #[serde(default)]
    pop: f64,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    icon: String,
}

impl OneCallResponse {
    fn observation_at(self, time: DateTime<Utc>) -> Result<WeatherObservation> {
        let hour = self
            .hourly
            .into_iter()
            .find(|h| {
                DateTime::from_timestamp(h.dt, 0)
                    .is_some_and(|start| start <= time && time < start + TimeDelta::hours(1))
            })
            .ok_or_else(|| {
                anyhow!(
                    "No hourly forecast covers {}; time is outside the supported range",
                    time.to_rfc3339()
                )
            })?;

        let icon = hour
            .weather
            .into_iter()
            .next()
            .map(|c| c.icon)
            .context("Hourly forecast has no weather condition")?;

        Ok(WeatherObservation {
            temperature: hour.temp,
            precip_chance: hour.pop,
            weather_icon_id: icon,
        })
    }
}
