// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Forecast API payloads and response validation.
//!
//! The forecast service answers `GET /predict` with either a forecast body or
//! an error body carrying a `detail` or `error` field. An error field wins even
//! when the HTTP status reports success.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message used when an error response carries no usable description.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Message shown when the forecast service cannot be reached at all.
pub const UNREACHABLE_MESSAGE: &str = "Failed to reach API. Is the forecast service running?";

/// Errors that can occur while requesting a forecast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// The service answered with a success status but an error payload.
    #[error("application error: {message}")]
    Application { message: String },

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never completed or the body was unusable.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ForecastError {
    /// Text shown to the user when this error is surfaced.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Application { message } | Self::Http { message, .. } => {
                format!("API Error: {message}")
            }
            Self::Transport(_) => UNREACHABLE_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Successful forecast response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub forecast: Forecast,
    pub location: Location,
}

/// Next-day forecast values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Maximum temperature in degrees Celsius.
    pub temperature_max_c: f64,
    /// Total rainfall in millimetres.
    pub rain_sum_mm: f64,
    /// Wind speed in km/h.
    pub wind_speed_kmh: f64,
    /// Forecast date (`YYYY-MM-DD`), when the service reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Name of the model that produced the forecast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Location metadata echoed back by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Ground elevation in metres.
    pub elevation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<f64>,
}

/// Validate a raw response and decode the forecast.
///
/// The body must be JSON other than `null`. A non-success `status`, a `detail` field or an
/// `error` field makes the response a failure; `detail` is preferred over
/// `error` for the message. A success body that does not decode into a
/// [`ForecastResult`] is reported as a transport error.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<ForecastResult, ForecastError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ForecastError::Transport(format!("invalid JSON response: {e}")))?;
    if value.is_null() {
        return Err(ForecastError::Transport("empty JSON response".to_string()));
    }

    let success = (200..300).contains(&status);
    let detail = error_message(value.get("detail"));
    let error = error_message(value.get("error"));

    if !success || detail.is_some() || error.is_some() {
        let message = detail
            .or(error)
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        return Err(if success {
            ForecastError::Application { message }
        } else {
            ForecastError::Http { status, message }
        });
    }

    serde_json::from_value(value)
        .map_err(|e| ForecastError::Transport(format!("malformed forecast response: {e}")))
}

/// Extract a displayable message from an error field.
///
/// Empty and null-like values count as absent. Structured values (such as a
/// list of validation errors) are rendered as compact JSON.
fn error_message(field: Option<&Value>) -> Option<String> {
    match field? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS_BODY: &str = r#"{
        "location": {"lat": 51.5074, "long": -0.1278, "elevation": 245.6},
        "forecast": {
            "date": "2025-06-02",
            "temperature_max_c": 18.2,
            "rain_sum_mm": 0.4,
            "wind_speed_kmh": 12.7,
            "description": "Hybrid Multi-Output RF"
        }
    }"#;

    #[test]
    fn test_success_body() {
        let result = interpret_response(200, SUCCESS_BODY.as_bytes()).unwrap();
        assert!((result.forecast.temperature_max_c - 18.2).abs() < f64::EPSILON);
        assert!((result.forecast.rain_sum_mm - 0.4).abs() < f64::EPSILON);
        assert!((result.forecast.wind_speed_kmh - 12.7).abs() < f64::EPSILON);
        assert!((result.location.elevation - 245.6).abs() < f64::EPSILON);
        assert_eq!(result.forecast.date.as_deref(), Some("2025-06-02"));
        assert_eq!(result.forecast.description.as_deref(), Some("Hybrid Multi-Output RF"));
    }

    #[test]
    fn test_minimal_success_body() {
        let body = br#"{"forecast":{"temperature_max_c":1,"rain_sum_mm":0,"wind_speed_kmh":3},"location":{"elevation":-2}}"#;
        let result = interpret_response(200, body).unwrap();
        assert_eq!(result.forecast.date, None);
        assert_eq!(result.location.lat, None);
    }

    #[test]
    fn test_error_field_with_ok_status() {
        let err = interpret_response(200, br#"{"error":"no data"}"#).unwrap_err();
        assert_eq!(
            err,
            ForecastError::Application {
                message: "no data".to_string()
            }
        );
        assert!(err.user_message().contains("no data"));
    }

    #[test]
    fn test_detail_with_server_error() {
        let err = interpret_response(500, br#"{"detail":"server error"}"#).unwrap_err();
        assert_eq!(
            err,
            ForecastError::Http {
                status: 500,
                message: "server error".to_string()
            }
        );
        assert_eq!(err.user_message(), "API Error: server error");
    }

    #[test]
    fn test_detail_preferred_over_error() {
        let err = interpret_response(400, br#"{"detail":"Insufficient data.","error":"other"}"#)
            .unwrap_err();
        assert_eq!(err.user_message(), "API Error: Insufficient data.");
    }

    #[test]
    fn test_failure_status_without_message() {
        let err = interpret_response(503, b"{}").unwrap_err();
        assert_eq!(err.user_message(), "API Error: Unknown error");
    }

    #[test]
    fn test_empty_detail_is_ignored() {
        let err = interpret_response(502, br#"{"detail":"","error":"upstream down"}"#).unwrap_err();
        assert_eq!(err.user_message(), "API Error: upstream down");
    }

    #[test]
    fn test_structured_detail_rendered_as_json() {
        let body = br#"{"detail":[{"loc":["query","lat"],"msg":"field required"}]}"#;
        let err = interpret_response(422, body).unwrap_err();
        assert_eq!(
            err.user_message(),
            r#"API Error: [{"loc":["query","lat"],"msg":"field required"}]"#
        );
    }

    #[test]
    fn test_non_json_body_is_transport_error() {
        let err = interpret_response(500, b"Internal Server Error").unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.user_message(), UNREACHABLE_MESSAGE);
    }

    #[test]
    fn test_null_body_is_transport_error() {
        let err = interpret_response(500, b"null").unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.user_message(), UNREACHABLE_MESSAGE);
    }

    #[test]
    fn test_scalar_body_with_failure_status() {
        let err = interpret_response(500, br#""oops""#).unwrap_err();
        assert_eq!(err.user_message(), "API Error: Unknown error");
    }

    #[test]
    fn test_missing_forecast_is_transport_error() {
        let err = interpret_response(200, br#"{"location":{"elevation":10.0}}"#).unwrap_err();
        assert!(err.is_transport());
    }
}
