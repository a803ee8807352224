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

//! Modal alert dialog.
//!
//! Errors from the click handler are queued here and shown one at a time in a
//! modal that blocks interaction with the map until dismissed.

use std::collections::VecDeque;

use eframe::egui;
use forecast_client::Notifier;

/// Pending user-facing alerts, oldest first
#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: VecDeque<String>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alert currently on screen
    pub fn current(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Dismiss the alert on screen
    pub fn dismiss(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    /// Render the front alert as a modal dialog
    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(message) = self.current().map(str::to_owned) else {
            return;
        };

        let modal = egui::Modal::new(egui::Id::new("forecast_alert")).show(ctx, |ui| {
            ui.set_width(340.0);
            ui.heading("Forecast Map");
            ui.add_space(6.0);
            ui.label(message.as_str());
            ui.add_space(10.0);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.button("OK").clicked()
            })
            .inner
        });

        let confirmed = modal.inner;
        let enter = ctx.input(|i| i.key_pressed(egui::Key::Enter));
        if confirmed || enter || modal.should_close() {
            self.dismiss();
        }
    }
}

impl Notifier for AlertQueue {
    fn notify(&mut self, message: &str) {
        self.pending.push_back(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alerts_shown_in_order() {
        let mut alerts = AlertQueue::new();
        assert!(alerts.is_empty());

        alerts.notify("API Error: no data");
        alerts.notify("API Error: server error");
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts.current(), Some("API Error: no data"));

        alerts.dismiss();
        assert_eq!(alerts.current(), Some("API Error: server error"));

        alerts.dismiss();
        assert!(alerts.current().is_none());
    }
}
