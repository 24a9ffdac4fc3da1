//! JSON API served under `/api`

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::WeatherRouteError;
use crate::models::Route;
use crate::overlay::{OverlayService, WeatherOverlay};
use crate::providers::PlacesProvider;
use crate::sampling::{SamplePolicy, Spacing};

mod error;

pub use error::ApiError;

const TRAVEL_MODE: &str = "DRIVING";

#[derive(Clone)]
pub struct AppState {
    pub overlay: Arc<OverlayService>,
    pub places: Arc<dyn PlacesProvider>,
}

impl AppState {
    pub fn new(overlay: OverlayService, places: Arc<dyn PlacesProvider>) -> Self {
        Self {
            overlay: Arc::new(overlay),
            places,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsRequest {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsResponse {
    pub routes: Vec<Route>,
    pub travel_mode: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRequest {
    pub routes: Vec<Route>,
    #[serde(default)]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub spacing_minutes: Option<u32>,
    #[serde(default)]
    pub max_samples: Option<usize>,
}

impl WeatherRequest {
    /// Per-request overrides on top of the configured policy
    fn sample_policy(&self, default: SamplePolicy) -> crate::Result<SamplePolicy> {
        let mut policy = default;
        if let Some(minutes) = self.spacing_minutes {
            if minutes == 0 {
                return Err(WeatherRouteError::validation(
                    "spacingMinutes must be greater than zero",
                ));
            }
            policy.spacing = Spacing::Time(Duration::from_secs(u64::from(minutes) * 60));
        }
        if let Some(max_samples) = self.max_samples {
            if max_samples < 2 {
                return Err(WeatherRouteError::validation(
                    "maxSamples must be at least 2",
                ));
            }
            policy.max_samples = max_samples;
        }
        Ok(policy)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest {
    pub place_to_auto_complete: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTimeResponse {
    pub server_time: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/directions", post(post_directions))
        .route("/weather", post(post_weather))
        .route("/autocomplete", post(post_autocomplete))
        .route("/server-time", get(get_server_time))
        .with_state(state)
}

#[instrument(skip_all)]
async fn post_directions(
    State(state): State<AppState>,
    payload: Result<Json<DirectionsRequest>, JsonRejection>,
) -> Result<Json<DirectionsResponse>, ApiError> {
    let Json(request) = payload?;
    let route = state
        .overlay
        .get_route(&request.origin, &request.destination)
        .await?;

    Ok(Json(DirectionsResponse {
        routes: vec![route],
        travel_mode: TRAVEL_MODE.to_string(),
    }))
}

#[instrument(skip_all)]
async fn post_weather(
    State(state): State<AppState>,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<Json<WeatherOverlay>, ApiError> {
    let Json(request) = payload?;
    let policy = request.sample_policy(state.overlay.default_policy())?;
    let route = request
        .routes
        .first()
        .ok_or_else(|| WeatherRouteError::validation("No route supplied"))?;

    let overlay = state
        .overlay
        .get_weather_overlay(route, request.departure_time, &policy)
        .await?;
    Ok(Json(overlay))
}

/// 204 when nothing matches, so widgets can tell "no match" from an error
#[instrument(skip_all)]
async fn post_autocomplete(
    State(state): State<AppState>,
    payload: Result<Json<AutocompleteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<String>>), ApiError> {
    let Json(request) = payload?;
    let input = request.place_to_auto_complete.trim();
    if input.is_empty() {
        return Err(WeatherRouteError::validation("placeToAutoComplete cannot be empty").into());
    }

    let suggestions = state
        .places
        .suggest(input)
        .await
        .map_err(|e| WeatherRouteError::api(format!("Autocomplete failed: {e:#}")))?;

    let status = if suggestions.is_empty() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    };
    Ok((status, Json(suggestions)))
}

async fn get_server_time() -> Json<ServerTimeResponse> {
    Json(ServerTimeResponse {
        server_time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}
