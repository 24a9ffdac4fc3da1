use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use weather_route::api::AppState;
use weather_route::providers::{
    GoogleDirectionsProvider, GooglePlacesProvider, OpenWeatherProvider,
};
use weather_route::{OverlayService, WeatherRouteConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine as long as the keys come from somewhere
    dotenvy::dotenv().ok();

    let config = WeatherRouteConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging);
    config.validate_api_keys()?;

    info!("Starting weather-route {}", weather_route::VERSION);

    let directions = Arc::new(GoogleDirectionsProvider::new(&config.directions)?);
    let weather = Arc::new(OpenWeatherProvider::new(&config.weather)?);
    let places = Arc::new(GooglePlacesProvider::new(&config.directions)?);
    let overlay = OverlayService::from_config(&config, directions, weather);

    web::run(&config.server, AppState::new(overlay, places)).await?;
    Ok(())
}
