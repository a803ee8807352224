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

//! HTTP layer for the forecast service.
//!
//! Provides the [`ForecastApi`] seam used by the click handler and a
//! `reqwest`-backed implementation talking to `GET /predict`.

use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use reqwest::Url;
use thiserror::Error;

use crate::coord::Coordinate;
use crate::protocol::{interpret_response, ForecastError, ForecastResult};

/// Default base URL of the forecast service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Path of the forecast endpoint, relative to the base URL.
pub const PREDICT_PATH: &str = "predict";

/// Source of forecasts for a coordinate.
pub trait ForecastApi: Send + Sync {
    /// Request the forecast for an already rounded coordinate.
    fn fetch(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<ForecastResult, ForecastError>> + Send;
}

/// Errors raised while building the HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Configuration for [`HttpForecastClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the forecast service, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Forecast client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpForecastClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpForecastClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let endpoint = predict_endpoint(&config.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    /// The resolved `/predict` endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for a coordinate, e.g. `.../predict?lat=51.5074&long=-0.1278`.
    #[must_use]
    pub fn request_url(&self, coordinate: Coordinate) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in coordinate.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        url
    }
}

impl ForecastApi for HttpForecastClient {
    async fn fetch(&self, coordinate: Coordinate) -> Result<ForecastResult, ForecastError> {
        let url = self.request_url(coordinate);
        info!("Requesting forecast: GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ForecastError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ForecastError::Transport(e.to_string()))?;

        debug!(
            "Forecast response for {coordinate}: {status} ({} bytes)",
            body.len()
        );

        interpret_response(status.as_u16(), &body)
    }
}

/// Resolve `<base>/predict`, keeping any path prefix on the base URL.
fn predict_endpoint(base_url: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(PREDICT_PATH).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_client(base_url: &str) -> HttpForecastClient {
        HttpForecastClient::new(&ClientConfig {
            base_url: base_url.to_string(),
            timeout: None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_from_host() {
        let client = make_client("http://127.0.0.1:8000");
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:8000/predict");
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let client = make_client("https://example.com/weather");
        assert_eq!(client.endpoint().as_str(), "https://example.com/weather/predict");

        let client = make_client("https://example.com/weather/");
        assert_eq!(client.endpoint().as_str(), "https://example.com/weather/predict");
    }

    #[test]
    fn test_request_url_query() {
        let client = make_client("http://localhost:8000");
        let url = client.request_url(Coordinate::rounded(54.5, -3.5));
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/predict?lat=54.5000&long=-3.5000"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpForecastClient::new(&ClientConfig {
            base_url: "not a url".to_string(),
            timeout: None,
        });
        assert!(matches!(result, Err(ClientError::InvalidBaseUrl { .. })));
    }
}
