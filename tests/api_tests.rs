//! HTTP surface tests, driving the axum app in-process

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use common::{FakeDirections, FakePlaces, FakeWeather, two_leg_route};
use serde_json::{Value, json};
use tower::ServiceExt;
use weather_route::api::AppState;
use weather_route::{CorrelationOptions, OverlayService, SamplePolicy, web};

fn app() -> Router {
    let overlay = OverlayService::new(
        Arc::new(FakeDirections {
            route: two_leg_route(),
        }),
        Arc::new(FakeWeather::default()),
        CorrelationOptions::default(),
        SamplePolicy::every(Duration::from_secs(3600), 10),
    );
    web::app(
        AppState::new(overlay, Arc::new(FakePlaces::default())),
        "no-such-static-dir",
    )
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_server_time() {
    let request = Request::builder()
        .uri("/api/server-time")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    let time = body["serverTime"].as_str().unwrap();
    let parsed = DateTime::parse_from_rfc3339(time).unwrap();
    assert!((Utc::now() - parsed.with_timezone(&Utc)).num_seconds().abs() < 60);
}

#[tokio::test]
async fn test_directions() {
    let body = json!({"origin": "Denver, CO", "destination": "Fort Collins, CO"});
    let (status, body) = send(post_json("/api/directions", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["travelMode"], "DRIVING");
    assert_eq!(body["routes"].as_array().unwrap().len(), 1);
    assert_eq!(body["routes"][0]["legs"][0]["steps"][0]["durationSeconds"], 3600);
}

#[tokio::test]
async fn test_directions_validation_and_upstream_errors() {
    let body = json!({"origin": "", "destination": "Fort Collins, CO"});
    let (status, body) = send(post_json("/api/directions", body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("cannot be empty"));

    let body = json!({"origin": "Atlantis", "destination": "Denver"});
    let (status, body) = send(post_json("/api/directions", body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_weather_overlay() {
    let body = json!({ "routes": [two_leg_route()] });
    let (status, body) = send(post_json("/api/weather", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let points = body["points"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0]["coordinate"]["lat"], 40.0);
    assert_eq!(points[2]["weatherData"]["weatherIconId"], "10d");
    assert_eq!(body["display"].as_array().unwrap().len(), 3);
    assert_eq!(
        body["display"][0]["iconUrl"],
        "https://openweathermap.org/img/wn/10d.png"
    );
    assert!(body["skipped"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_weather_overrides_sampling() {
    let body = json!({
        "routes": [two_leg_route()],
        "departureTime": Utc::now().to_rfc3339(),
        "maxSamples": 2
    });
    let (status, body) = send(post_json("/api/weather", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let lats: Vec<f64> = body["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["coordinate"]["lat"].as_f64().unwrap())
        .collect();
    assert_eq!(lats, vec![40.0, 40.75]);
}

#[tokio::test]
async fn test_weather_rejects_bad_input() {
    let (status, body) = send(post_json("/api/weather", "not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Unable to decode request"));

    let (status, _) = send(post_json("/api/weather", json!({"routes": []}).to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut route = serde_json::to_value(two_leg_route()).unwrap();
    route["legs"][0]["steps"][0]["polyline"] = json!("_p~iF~ps|U_");
    let (status, _) = send(post_json("/api/weather", json!({"routes": [route]}).to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut route = serde_json::to_value(two_leg_route()).unwrap();
    route["legs"] = json!([]);
    let (status, body) = send(post_json("/api/weather", json!({"routes": [route]}).to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("route is empty"));
}

#[tokio::test]
async fn test_autocomplete_suggestions() {
    let body = json!({"placeToAutoComplete": "Denver"});
    let (status, body) = send(post_json("/api/autocomplete", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            "Denver, CO, USA",
            "Denver International Airport, Denver, CO, USA"
        ])
    );
}

#[tokio::test]
async fn test_autocomplete_without_match_or_input() {
    let body = json!({"placeToAutoComplete": "Boulder"});
    let (status, _) = send(post_json("/api/autocomplete", body.to_string())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let body = json!({"placeToAutoComplete": "   "});
    let (status, body) = send(post_json("/api/autocomplete", body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("cannot be empty"));

    let body = json!({"placeToAutoComplete": "Atlantis"});
    let (status, body) = send(post_json("/api/autocomplete", body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["message"].as_str().unwrap().contains("Unable to reach"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let oversized = 8 * 1024 * 1024 + 1;
    let request = Request::builder()
        .method("POST")
        .uri("/api/weather")
        .header("content-type", "application/json")
        .header("content-length", oversized)
        .body(Body::from(vec![b' '; oversized]))
        .unwrap();
    let (status, _) = send(request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
