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

//! Map click handling.
//!
//! [`MapClickHandler`] owns everything a click touches: the single map
//! marker, the loading/result state and the text shown in the result panel.
//! A click is split in two halves so the network wait can happen elsewhere:
//! [`MapClickHandler::click`] runs immediately and returns a
//! [`ForecastTicket`], and [`MapClickHandler::complete`] applies the outcome
//! once the request settles.

use log::{debug, error, info, warn};

use crate::coord::Coordinate;
use crate::http::ForecastApi;
use crate::protocol::{ForecastError, ForecastResult};

/// Synchronous user notification channel used on error paths.
pub trait Notifier {
    /// Show `message` to the user.
    fn notify(&mut self, message: &str);
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str) {
        warn!("{message}");
    }
}

/// Visible state of the loading indicator and result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    /// Nothing clicked yet.
    #[default]
    Idle,
    /// A request is outstanding (or an error left the indicator up).
    Loading,
    /// Forecast fields are on screen.
    ShowingResult,
    /// An error was reported and the loading indicator was hidden.
    ShowingError,
}

impl UiState {
    #[must_use]
    pub fn loading_visible(self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn result_visible(self) -> bool {
        matches!(self, Self::ShowingResult)
    }
}

/// The marker showing the last clicked location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    position: Coordinate,
}

impl Marker {
    #[must_use]
    pub fn new(position: Coordinate) -> Self {
        Self { position }
    }

    #[must_use]
    pub fn position(&self) -> Coordinate {
        self.position
    }
}

/// Text written into the result panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayFields {
    pub temp: String,
    pub rain: String,
    pub wind: String,
    pub coords: String,
    pub location_name: String,
    pub forecast_date: Option<String>,
    pub model_description: Option<String>,
}

impl DisplayFields {
    /// Render a forecast for the coordinate it was requested for.
    #[must_use]
    pub fn from_result(coordinate: Coordinate, result: &ForecastResult) -> Self {
        Self {
            temp: format_value(result.forecast.temperature_max_c),
            rain: format_value(result.forecast.rain_sum_mm),
            wind: format_value(result.forecast.wind_speed_kmh),
            coords: coordinate.to_string(),
            location_name: format_elevation(result.location.elevation),
            forecast_date: result.forecast.date.clone(),
            model_description: result.forecast.description.clone(),
        }
    }
}

/// Shortest decimal text for a forecast value (`18.2`, `18` for `18.0`).
#[must_use]
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        // covers -0.0
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// `Elevation: <metres>m`, rounded half up to whole metres.
#[must_use]
pub fn format_elevation(elevation: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "elevations are far inside i64 range"
    )]
    let metres = (elevation + 0.5).floor() as i64;
    format!("Elevation: {metres}m")
}

/// Optional behaviour changes on top of the default click handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandlerOptions {
    /// Hide the loading indicator when an error is reported. Off by default,
    /// which leaves the indicator up until the next successful click.
    pub hide_loading_on_error: bool,
    /// Drop responses for clicks older than the newest one. Off by default,
    /// so the last response to arrive wins.
    pub discard_stale_responses: bool,
}

/// Identifies the click a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastTicket {
    /// Click counter value, starting at 1.
    pub generation: u64,
    /// Rounded coordinate that was requested.
    pub coordinate: Coordinate,
}

/// What [`MapClickHandler::complete`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Forecast written to the display fields.
    Rendered,
    /// Error reported to the user.
    Failed,
    /// Stale response ignored.
    Discarded,
}

/// Handles clicks on the map surface.
#[derive(Debug)]
pub struct MapClickHandler<N> {
    notifier: N,
    options: HandlerOptions,
    marker: Option<Marker>,
    state: UiState,
    display: Option<DisplayFields>,
    generation: u64,
}

impl<N: Notifier> MapClickHandler<N> {
    pub fn new(notifier: N) -> Self {
        Self::with_options(notifier, HandlerOptions::default())
    }

    pub fn with_options(notifier: N, options: HandlerOptions) -> Self {
        Self {
            notifier,
            options,
            marker: None,
            state: UiState::Idle,
            display: None,
            generation: 0,
        }
    }

    /// Capture a click: round the coordinate, move the marker and switch to
    /// the loading state. The returned ticket must be passed to
    /// [`complete`](Self::complete) once the request for it settles.
    pub fn click(&mut self, latitude: f64, longitude: f64) -> ForecastTicket {
        let coordinate = Coordinate::rounded(latitude, longitude);

        if let Some(previous) = self.marker.replace(Marker::new(coordinate)) {
            debug!("Removed marker at {}", previous.position());
        }

        self.state = UiState::Loading;
        self.generation += 1;

        info!("Map clicked at {coordinate} (request #{})", self.generation);

        ForecastTicket {
            generation: self.generation,
            coordinate,
        }
    }

    /// Apply the outcome of the request issued for `ticket`.
    pub fn complete(
        &mut self,
        ticket: ForecastTicket,
        outcome: Result<ForecastResult, ForecastError>,
    ) -> Completion {
        if self.options.discard_stale_responses && ticket.generation < self.generation {
            debug!(
                "Discarding response #{} for {}, newest is #{}",
                ticket.generation, ticket.coordinate, self.generation
            );
            return Completion::Discarded;
        }

        match outcome {
            Ok(result) => {
                let fields = DisplayFields::from_result(ticket.coordinate, &result);
                info!(
                    "Forecast for {}: {}°C, {} mm, {} km/h",
                    fields.coords, fields.temp, fields.rain, fields.wind
                );
                self.display = Some(fields);
                self.state = UiState::ShowingResult;
                Completion::Rendered
            }
            Err(err) => {
                if err.is_transport() {
                    error!("Forecast request for {} failed: {err}", ticket.coordinate);
                } else {
                    warn!("Forecast API rejected {}: {err}", ticket.coordinate);
                }

                self.notifier.notify(&err.user_message());

                if self.options.hide_loading_on_error {
                    self.state = UiState::ShowingError;
                }
                Completion::Failed
            }
        }
    }

    /// Run a whole click: capture, fetch and apply.
    pub async fn handle_click<A: ForecastApi>(
        &mut self,
        api: &A,
        latitude: f64,
        longitude: f64,
    ) -> Completion {
        let ticket = self.click(latitude, longitude);
        let outcome = api.fetch(ticket.coordinate).await;
        self.complete(ticket, outcome)
    }

    #[must_use]
    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> UiState {
        self.state
    }

    /// Last rendered forecast, if any. Kept across later clicks; whether it
    /// is visible is governed by [`state`](Self::state).
    #[must_use]
    pub fn display(&self) -> Option<&DisplayFields> {
        self.display.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn options(&self) -> HandlerOptions {
        self.options
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}
