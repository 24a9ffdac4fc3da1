use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use crate::WeatherRouteError;

/// Error returned by HTTP handlers, rendered as `{ "message": ... }`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    BadGateway(String),
    InternalServerError(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<WeatherRouteError> for ApiError {
    fn from(error: WeatherRouteError) -> Self {
        if error.is_client_error() {
            warn!("Rejected request: {}", error);
            return ApiError::BadRequest(error.user_message());
        }
        match error {
            WeatherRouteError::Api { .. } => {
                warn!("Upstream provider failed: {}", error);
                ApiError::BadGateway(error.user_message())
            }
            other => {
                error!("Request failed: {}", other);
                ApiError::InternalServerError(other.user_message())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Unable to decode request body: {}", rejection.body_text());
        ApiError::BadRequest(format!("Unable to decode request: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(m) | ApiError::BadGateway(m) | ApiError::InternalServerError(m) => m,
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
