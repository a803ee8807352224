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

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format:
//! where the forecast service lives, where the map starts, and the optional
//! behaviour switches of the click handler.

use std::time::Duration;

use forecast_client::{ClientConfig, HandlerOptions, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "forecast-map";
const CONFIG_NAME: &str = "config";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Base URL of the forecast service (the `/predict` endpoint lives under it)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Initial map center latitude
    #[serde(default = "default_initial_latitude")]
    pub initial_latitude: f64,

    /// Initial map center longitude
    #[serde(default = "default_initial_longitude")]
    pub initial_longitude: f64,

    /// Initial map zoom level
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    /// Request timeout in seconds; unset waits for the service indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Hide the loading indicator when a forecast request fails
    #[serde(default)]
    pub hide_loading_on_error: bool,

    /// Ignore responses that belong to an older click
    #[serde(default)]
    pub discard_stale_responses: bool,

    /// Cache map tiles on disk
    #[serde(default = "default_true")]
    pub tile_cache: bool,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_initial_latitude() -> f64 {
    54.5
}

fn default_initial_longitude() -> f64 {
    -3.5
}

fn default_zoom() -> f64 {
    6.0
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            api_base_url: default_api_base_url(),
            initial_latitude: default_initial_latitude(),
            initial_longitude: default_initial_longitude(),
            default_zoom: default_zoom(),
            request_timeout_secs: None,
            hide_loading_on_error: false,
            discard_stale_responses: false,
            tile_cache: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults on first run
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// HTTP client settings for the forecast service
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Click handler behaviour switches
    pub fn handler_options(&self) -> HandlerOptions {
        HandlerOptions {
            hide_loading_on_error: self.hide_loading_on_error,
            discard_stale_responses: self.discard_stale_responses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert!((config.initial_latitude - 54.5).abs() < f64::EPSILON);
        assert!((config.initial_longitude + 3.5).abs() < f64::EPSILON);
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.handler_options(), HandlerOptions::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            api_base_url = "http://forecast.local:9000"
            request_timeout_secs = 20
            hide_loading_on_error = true
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "http://forecast.local:9000");
        assert!((config.default_zoom - 6.0).abs() < f64::EPSILON);
        assert!(config.tile_cache);

        let client = config.client_config();
        assert_eq!(client.timeout, Some(Duration::from_secs(20)));
        assert!(config.handler_options().hide_loading_on_error);
        assert!(!config.handler_options().discard_stale_responses);
    }

    #[test]
    fn test_round_trip() {
        let config = AppConfig {
            discard_stale_responses: true,
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
