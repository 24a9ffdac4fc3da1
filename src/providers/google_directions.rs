//! Google Directions API client

use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::DirectionsProvider;
use super::http::{redact_key, retrying_client};
use crate::config::DirectionsConfig;
use crate::models::{Bounds, Coordinate, EncodedPath, Leg, Route, Step};

pub struct GoogleDirectionsProvider {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
}

impl GoogleDirectionsProvider {
    pub fn new(config: &DirectionsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .context("Missing directions API key")?;
        let client = retrying_client(
            Duration::from_secs(u64::from(config.timeout_seconds)),
            config.max_retries,
        )?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn directions_url(&self, origin: &str, destination: &str) -> String {
        format!(
            "{}/directions/json?origin={}&destination={}&mode=driving&key={}",
            self.base_url,
            urlencoding::encode(origin),
            urlencoding::encode(destination),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirectionsProvider {
    #[instrument(skip(self))]
    async fn route(&self, origin: &str, destination: &str) -> Result<Route> {
        let start = Instant::now();
        let url = self.directions_url(origin, destination);
        debug!("Requesting {}", redact_key(&url, &self.api_key));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Directions request failed")?
            .error_for_status()
            .context("Directions API returned an error status")?;

        let body: DirectionsResponse = response
            .json()
            .await
            .context("Failed to parse directions response")?;

        let route = body.into_route()?;
        info!(
            "Directions from '{}' to '{}' fetched in {:?}",
            origin,
            destination,
            start.elapsed()
        );
        Ok(route)
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    legs: Vec<ApiLeg>,
    #[serde(default)]
    overview_polyline: Option<ApiPolyline>,
    #[serde(default)]
    bounds: Option<ApiBounds>,
}

#[derive(Debug, Deserialize)]
struct ApiLeg {
    steps: Vec<ApiStep>,
    start_location: ApiLatLng,
    end_location: ApiLatLng,
}

#[derive(Debug, Deserialize)]
struct ApiStep {
    polyline: ApiPolyline,
    duration: ApiValue,
    start_location: ApiLatLng,
    end_location: ApiLatLng,
    #[serde(default)]
    steps: Vec<ApiStep>,
}

#[derive(Debug, Deserialize)]
struct ApiPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct ApiValue {
    value: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ApiLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct ApiBounds {
    northeast: ApiLatLng,
    southwest: ApiLatLng,
}

impl DirectionsResponse {
    fn into_route(self) -> Result<Route> {
        match self.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => bail!("no route found"),
            other => {
                return Err(anyhow!(
                    "Directions API status {}: {}",
                    other,
                    self.error_message.unwrap_or_default()
                ));
            }
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no route found"))?;
        route.try_into()
    }
}

impl TryFrom<ApiRoute> for Route {
    type Error = anyhow::Error;

    fn try_from(route: ApiRoute) -> Result<Self> {
        let legs = route
            .legs
            .into_iter()
            .map(|leg| -> Result<Leg> {
                Ok(Leg {
                    steps: leg
                        .steps
                        .into_iter()
                        .map(Step::try_from)
                        .collect::<Result<_>>()?,
                    start_location: leg.start_location.try_into()?,
                    end_location: leg.end_location.try_into()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let bounds = match route.bounds {
            Some(b) => Some(Bounds {
                northeast: b.northeast.try_into()?,
                southwest: b.southwest.try_into()?,
            }),
            // fall back to the extent of the step endpoints
            None => Bounds::around(
                &legs
                    .iter()
                    .flat_map(|leg: &Leg| &leg.steps)
                    .flat_map(|step| [step.start_location, step.end_location])
                    .collect::<Vec<_>>(),
            ),
        };

        Ok(Route {
            legs,
            overview_polyline: route
                .overview_polyline
                .map(|p| EncodedPath(p.points))
                .unwrap_or_default(),
            bounds,
        })
    }
}

impl TryFrom<ApiStep> for Step {
    type Error = anyhow::Error;

    fn try_from(step: ApiStep) -> Result<Self> {
        Ok(Step {
            polyline: EncodedPath(step.polyline.points),
            duration_seconds: step.duration.value,
            start_location: step.start_location.try_into()?,
            end_location: step.end_location.try_into()?,
            sub_steps: step
                .steps
                .into_iter()
                .map(Step::try_from)
                .collect::<Result<_>>()?,
        })
    }
}

impl TryFrom<ApiLatLng> for Coordinate {
    type Error = anyhow::Error;

    fn try_from(p: ApiLatLng) -> Result<Self> {
        Coordinate::new(p.lat, p.lng).context("Directions API returned an invalid coordinate")
    }
}
