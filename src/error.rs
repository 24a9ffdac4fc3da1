//! Error types and handling for the weather route service

use thiserror::Error;

/// Request-level error for the weather route service.
///
/// Per-sample problems (a failed or skipped weather lookup) are not errors;
/// they are reported as [`crate::correlate::SampleSkip`] values next to the
/// points that did succeed.
#[derive(Error, Debug)]
pub enum WeatherRouteError {
    /// The encoded route geometry could not be decoded
    #[error("Malformed polyline encoding: {message}")]
    MalformedEncoding { message: String },

    /// The route has no legs or no steps to walk
    #[error("Route contains no legs or steps")]
    EmptyRoute,

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream provider errors (directions, weather)
    #[error("API error: {message}")]
    Api { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WeatherRouteError {
    /// Create a new malformed encoding error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedEncoding {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input rather than by us or a provider
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedEncoding { .. } | Self::EmptyRoute | Self::Validation { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherRouteError::MalformedEncoding { .. } => {
                "The route geometry could not be read. Please request the route again.".to_string()
            }
            WeatherRouteError::EmptyRoute => {
                "The route is empty. Please check the origin and destination.".to_string()
            }
            WeatherRouteError::Validation { message } => format!("Invalid input: {message}"),
            WeatherRouteError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            WeatherRouteError::Api { .. } => {
                "Unable to reach the directions or weather service. Please try again later."
                    .to_string()
            }
            WeatherRouteError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
