//! Google Places autocomplete client

use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::PlacesProvider;
use super::http::{redact_key, retrying_client};
use crate::config::DirectionsConfig;

/// Suggestions are limited to US street addresses
const PLACE_TYPES: &str = "address";
const COUNTRY: &str = "country:us";

pub struct GooglePlacesProvider {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
}

impl GooglePlacesProvider {
    /// Shares the directions key and base URL; both live on the Maps platform
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

    fn autocomplete_url(&self, input: &str) -> String {
        format!(
            "{}/place/autocomplete/json?input={}&types={}&components={}&key={}",
            self.base_url,
            urlencoding::encode(input),
            PLACE_TYPES,
            urlencoding::encode(COUNTRY),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesProvider {
    #[instrument(skip(self))]
    async fn suggest(&self, input: &str) -> Result<Vec<String>> {
        let start = Instant::now();
        let url = self.autocomplete_url(input);
        debug!("Requesting {}", redact_key(&url, &self.api_key));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Autocomplete request failed")?
            .error_for_status()
            .context("Places API returned an error status")?;

        let body: AutocompleteResponse = response
            .json()
            .await
            .context("Failed to parse autocomplete response")?;

        let suggestions = body.into_descriptions()?;
        debug!(
            "{} suggestions fetched in {:?}",
            suggestions.len(),
            start.elapsed()
        );
        Ok(suggestions)
    }
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    description: String,
}

impl AutocompleteResponse {
    fn into_descriptions(self) -> Result<Vec<String>> {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(self
                .predictions
                .into_iter()
                .map(|p| p.description)
                .collect()),
            other => Err(anyhow!(
                "Places API status {}: {}",
                other,
                self.error_message.unwrap_or_default()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<String>> {
        serde_json::from_str::<AutocompleteResponse>(json)?.into_descriptions()
    }

    #[test]
    fn test_maps_prediction_descriptions() {
        let json = r#"{
            "status": "OK",
            "predictions": [
                {"description": "1600 Pennsylvania Avenue NW, Washington, DC, USA", "place_id": "a"},
                {"description": "1600 Pennsylvania Ave, Denver, CO, USA", "place_id": "b"}
            ]
        }"#;
        assert_eq!(
            parse(json).unwrap(),
            vec![
                "1600 Pennsylvania Avenue NW, Washington, DC, USA",
                "1600 Pennsylvania Ave, Denver, CO, USA"
            ]
        );
    }

    #[test]
    fn test_zero_results_is_empty() {
        assert!(parse(r#"{"status": "ZERO_RESULTS", "predictions": []}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_error_status_carries_message() {
        let err = parse(r#"{"status": "OVER_QUERY_LIMIT", "error_message": "quota"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Places API status OVER_QUERY_LIMIT: quota");
    }

    #[test]
    fn test_requires_api_key() {
        assert!(GooglePlacesProvider::new(&DirectionsConfig::default()).is_err());
    }

    #[test]
    fn test_url_is_encoded() {
        let provider = GooglePlacesProvider::new(&DirectionsConfig {
            api_key: Some("k".to_string()),
            base_url: "https://maps.test/api".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            provider.autocomplete_url("123 Main St"),
            "https://maps.test/api/place/autocomplete/json?input=123%20Main%20St&types=address&components=country%3Aus&key=k"
        );
    }
}
