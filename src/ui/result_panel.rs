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

//! Forecast result panel.
//!
//! Shows the loading indicator while a request is outstanding and the
//! forecast fields once one has been rendered. Which region is visible is
//! decided entirely by the handler's [`UiState`].

use chrono::NaiveDate;
use eframe::egui;
use forecast_client::{DisplayFields, UiState};

const HEADER_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 170, 230);
const LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);
const VALUE_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 230, 230);

/// Right-hand panel with the loading indicator and forecast fields
#[derive(Debug)]
pub struct ResultPanel<'a> {
    state: UiState,
    display: Option<&'a DisplayFields>,
    api_url: &'a str,
}

impl<'a> ResultPanel<'a> {
    pub fn new(state: UiState, display: Option<&'a DisplayFields>, api_url: &'a str) -> Self {
        Self {
            state,
            display,
            api_url,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.label(
            egui::RichText::new("Tomorrow's Forecast")
                .color(HEADER_COLOR)
                .size(18.0)
                .strong(),
        );
        ui.separator();

        match self.state {
            UiState::Idle => {
                ui.label("Click anywhere on the map to get a forecast.");
            }
            UiState::ShowingError => {
                ui.label(egui::RichText::new("Forecast unavailable.").color(LABEL_COLOR));
            }
            UiState::Loading | UiState::ShowingResult => {}
        }

        // loading region
        if self.state.loading_visible() {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label("Fetching forecast...");
            });
        }

        // result region
        if self.state.result_visible() {
            if let Some(fields) = self.display {
                Self::show_fields(ui, fields);
            }
        }

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            ui.label(
                egui::RichText::new(format!("API: {}", self.api_url))
                    .color(LABEL_COLOR)
                    .size(10.0)
                    .monospace(),
            );
        });
    }

    fn show_fields(ui: &mut egui::Ui, fields: &DisplayFields) {
        if let Some(date) = fields.forecast_date.as_deref() {
            ui.label(egui::RichText::new(format_forecast_date(date)).color(LABEL_COLOR));
            ui.add_space(4.0);
        }

        egui::Grid::new("forecast_fields")
            .num_columns(2)
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                field_row(ui, "Max temperature", &format!("{} °C", fields.temp));
                field_row(ui, "Rain", &format!("{} mm", fields.rain));
                field_row(ui, "Wind", &format!("{} km/h", fields.wind));
            });

        ui.add_space(8.0);
        ui.label(
            egui::RichText::new(&fields.coords)
                .color(VALUE_COLOR)
                .monospace(),
        );
        ui.label(egui::RichText::new(&fields.location_name).color(LABEL_COLOR));

        if let Some(description) = fields.model_description.as_deref() {
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(format!("Model: {description}"))
                    .color(LABEL_COLOR)
                    .size(10.0),
            );
        }
    }
}

fn field_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(egui::RichText::new(label).color(LABEL_COLOR));
    ui.label(
        egui::RichText::new(value)
            .color(VALUE_COLOR)
            .size(16.0)
            .strong(),
    );
    ui.end_row();
}

/// "Forecast for Tuesday 3 June", or the raw text if it is not a date
pub fn format_forecast_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => format!("Forecast for {}", parsed.format("%A %-d %B")),
        Err(_) => format!("Forecast for {date}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_forecast_date() {
        assert_eq!(format_forecast_date("2025-06-03"), "Forecast for Tuesday 3 June");
        assert_eq!(format_forecast_date("tomorrow"), "Forecast for tomorrow");
    }
}
