//! Deterministic providers and route builders shared by the integration tests

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use weather_route::models::Bounds;
use weather_route::{
    Coordinate, DirectionsProvider, EncodedPath, Leg, PlacesProvider, Route, Step,
    WeatherObservation, WeatherProvider,
};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

pub fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

pub fn step(path: &[Coordinate], duration_seconds: u64) -> Step {
    Step {
        polyline: EncodedPath::from_path(path),
        duration_seconds,
        start_location: path[0],
        end_location: path[path.len() - 1],
        sub_steps: Vec::new(),
    }
}

pub fn route(legs: Vec<Vec<Step>>) -> Route {
    let all: Vec<Coordinate> = legs
        .iter()
        .flatten()
        .flat_map(|s| [s.start_location, s.end_location])
        .collect();
    Route {
        legs: legs
            .into_iter()
            .map(|steps| Leg {
                start_location: steps[0].start_location,
                end_location: steps[steps.len() - 1].end_location,
                steps,
            })
            .collect(),
        overview_polyline: EncodedPath::from_path(&all),
        bounds: Bounds::around(&all),
    }
}

/// Denver-ish trip: one hour north, then half an hour further north
pub fn two_leg_route() -> Route {
    route(vec![
        vec![step(&[coord(40.0, -105.0), coord(40.5, -105.0)], 3600)],
        vec![step(&[coord(40.5, -105.0), coord(40.75, -105.0)], 1800)],
    ])
}

pub struct FakeDirections {
    pub route: Route,
}

#[async_trait]
impl DirectionsProvider for FakeDirections {
    async fn route(&self, origin: &str, _destination: &str) -> Result<Route> {
        if origin == "Atlantis" {
            return Err(anyhow!("no route found"));
        }
        Ok(self.route.clone())
    }
}

/// Answers with the latitude as temperature. Latitudes in `slow` never
/// answer in time, latitudes in `failing` return an error.
#[derive(Default)]
pub struct FakeWeather {
    pub slow: Vec<f64>,
    pub failing: Vec<f64>,
    pub calls: Mutex<Vec<(Coordinate, DateTime<Utc>)>>,
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn lookup(&self, coordinate: Coordinate, time: DateTime<Utc>) -> Result<WeatherObservation> {
        self.calls.lock().unwrap().push((coordinate, time));
        if self.slow.contains(&coordinate.latitude()) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.failing.contains(&coordinate.latitude()) {
            return Err(anyhow!("weather service unavailable"));
        }
        Ok(WeatherObservation {
            temperature: coordinate.latitude(),
            precip_chance: 0.4,
            weather_icon_id: "10d".to_string(),
        })
    }
}

/// Suggests the known places starting with the input. "Atlantis" fails.
pub struct FakePlaces {
    pub known: Vec<String>,
}

impl Default for FakePlaces {
    fn default() -> Self {
        Self {
            known: vec![
                "Denver, CO, USA".to_string(),
                "Denver International Airport, Denver, CO, USA".to_string(),
                "Fort Collins, CO, USA".to_string(),
            ],
        }
    }
}

#[async_trait]
impl PlacesProvider for FakePlaces {
    async fn suggest(&self, input: &str) -> Result<Vec<String>> {
        if input == "Atlantis" {
            return Err(anyhow!("REQUEST_DENIED"));
        }
        Ok(self
            .known
            .iter()
            .filter(|p| p.starts_with(input))
            .cloned()
            .collect())
    }
}
