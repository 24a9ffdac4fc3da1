//! Configuration management for the weather route service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherRouteError;
use crate::correlate::CorrelationOptions;
use crate::sampling::SamplePolicy;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherRouteConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Directions API configuration
    #[serde(default)]
    pub directions: DirectionsConfig,
    /// Sample point selection
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Weather lookup fan-out
    #[serde(default)]
    pub correlation: CorrelationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Unit system passed to the provider (standard, metric, imperial)
    #[serde(default = "default_weather_units")]
    pub units: String,
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
}

/// Directions API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsConfig {
    /// Google Maps backend API key
    pub api_key: Option<String>,
    #[serde(default = "default_directions_base_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_directions_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Minimum travel time between two samples
    #[serde(default = "default_spacing_minutes")]
    pub spacing_minutes: u32,
    /// Distance between samples; overrides the time spacing when set
    #[serde(default)]
    pub spacing_meters: Option<f64>,
    #[serde(default = "default_max_samples")]
    pub max_samples: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    #[serde(default = "default_forecast_horizon")]
    pub forecast_horizon_hours: u32,
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_seconds: u32,
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for every path outside `/api`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_units() -> String {
    "imperial".to_string()
}

fn default_http_timeout() -> u32 {
    30
}

fn default_weather_max_retries() -> u32 {
    2
}

fn default_directions_max_retries() -> u32 {
    2
}

fn default_directions_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_spacing_minutes() -> u32 {
    60
}

fn default_max_samples() -> u32 {
    24
}

fn default_forecast_horizon() -> u32 {
    24
}

fn default_lookup_timeout() -> u32 {
    10
}

fn default_max_concurrent_lookups() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            units: default_weather_units(),
            timeout_seconds: default_http_timeout(),
            max_retries: default_weather_max_retries(),
        }
    }
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_directions_base_url(),
            timeout_seconds: default_http_timeout(),
            max_retries: default_directions_max_retries(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            spacing_minutes: default_spacing_minutes(),
            spacing_meters: None,
            max_samples: default_max_samples(),
        }
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            forecast_horizon_hours: default_forecast_horizon(),
            lookup_timeout_seconds: default_lookup_timeout(),
            max_concurrent_lookups: default_max_concurrent_lookups(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl WeatherRouteConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> crate::Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> crate::Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|p| p.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHER_ROUTE_SAMPLING__MAX_SAMPLES=12 style overrides
        builder = builder.add_source(
            Environment::with_prefix("WEATHER_ROUTE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| WeatherRouteError::config(format!("Failed to build configuration: {e}")))?;

        let mut config: WeatherRouteConfig = settings.try_deserialize().map_err(|e| {
            WeatherRouteError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.apply_legacy_env(|key| std::env::var(key).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-route").join("config.toml"))
    }

    /// Fill gaps from the plain `WEATHER`, `MAPS_BACKEND` and `PORT` variables
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.weather.api_key.is_none() {
            self.weather.api_key = lookup("WEATHER");
        }
        if self.directions.api_key.is_none() {
            self.directions.api_key = lookup("MAPS_BACKEND");
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.units.is_empty() {
            self.weather.units = default_weather_units();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_http_timeout();
        }
        if self.directions.base_url.is_empty() {
            self.directions.base_url = default_directions_base_url();
        }
        if self.directions.timeout_seconds == 0 {
            self.directions.timeout_seconds = default_http_timeout();
        }
        if self.sampling.max_samples == 0 {
            self.sampling.max_samples = default_max_samples();
        }
        if self.correlation.forecast_horizon_hours == 0 {
            self.correlation.forecast_horizon_hours = default_forecast_horizon();
        }
        if self.correlation.lookup_timeout_seconds == 0 {
            self.correlation.lookup_timeout_seconds = default_lookup_timeout();
        }
        if self.correlation.max_concurrent_lookups == 0 {
            self.correlation.max_concurrent_lookups = default_max_concurrent_lookups();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Both keys are required to actually serve requests
    pub fn validate_api_keys(&self) -> crate::Result<()> {
        let weather_key = self.weather.api_key.as_deref().unwrap_or_default();
        let directions_key = self.directions.api_key.as_deref().unwrap_or_default();
        if weather_key.trim().is_empty() {
            return Err(WeatherRouteError::config(
                "Weather API key is missing. Set WEATHER or weather.api_key.",
            ));
        }
        if directions_key.trim().is_empty() {
            return Err(WeatherRouteError::config(
                "Directions API key is missing. Set MAPS_BACKEND or directions.api_key.",
            ));
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.weather.timeout_seconds > 300 || self.directions.timeout_seconds > 300 {
            return Err(WeatherRouteError::config(
                "HTTP timeout cannot exceed 300 seconds",
            ));
        }

        if self.weather.max_retries > 10 {
            return Err(WeatherRouteError::config(
                "Weather API max retries cannot exceed 10",
            ));
        }

        if self.directions.max_retries > 10 {
            return Err(WeatherRouteError::config(
                "Directions API max retries cannot exceed 10",
            ));
        }

        if self.sampling.spacing_minutes == 0 {
            return Err(WeatherRouteError::config(
                "Sample spacing in minutes must be at least 1",
            ));
        }

        if self.sampling.max_samples < 2 {
            return Err(WeatherRouteError::config(
                "Maximum samples must be at least 2 to cover departure and destination",
            ));
        }

        if let Some(meters) = self.sampling.spacing_meters {
            if !meters.is_finite() || meters <= 0.0 {
                return Err(WeatherRouteError::config(
                    "Sample spacing in meters must be a positive number",
                ));
            }
        }

        if !(1..=168).contains(&self.correlation.forecast_horizon_hours) {
            return Err(WeatherRouteError::config(
                "Forecast horizon must be between 1 and 168 hours",
            ));
        }

        if !(1..=300).contains(&self.correlation.lookup_timeout_seconds) {
            return Err(WeatherRouteError::config(
                "Lookup timeout must be between 1 and 300 seconds",
            ));
        }

        if !(1..=64).contains(&self.correlation.max_concurrent_lookups) {
            return Err(WeatherRouteError::config(
                "Concurrent lookups must be between 1 and 64",
            ));
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherRouteError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherRouteError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        let valid_units = ["standard", "metric", "imperial"];
        if !valid_units.contains(&self.weather.units.as_str()) {
            return Err(WeatherRouteError::config(format!(
                "Invalid weather units '{}'. Must be one of: {}",
                self.weather.units,
                valid_units.join(", ")
            )));
        }

        for (name, url) in [
            ("Weather", &self.weather.base_url),
            ("Directions", &self.directions.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherRouteError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn sample_policy(&self) -> SamplePolicy {
        let max_samples = self.sampling.max_samples as usize;
        match self.sampling.spacing_meters {
            Some(meters) => SamplePolicy::every_meters(meters, max_samples),
            None => SamplePolicy::every(
                Duration::from_secs(u64::from(self.sampling.spacing_minutes) * 60),
                max_samples,
            ),
        }
    }

    #[must_use]
    pub fn correlation_options(&self) -> CorrelationOptions {
        CorrelationOptions {
            forecast_horizon: Duration::from_secs(
                u64::from(self.correlation.forecast_horizon_hours) * 60 * 60,
            ),
            lookup_timeout: Duration::from_secs(u64::from(self.correlation.lookup_timeout_seconds)),
            max_concurrent_lookups: self.correlation.max_concurrent_lookups as usize,
        }
    }
}
