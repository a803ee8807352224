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

//! Map plugin that reports primary clicks and draws the forecast marker.

use eframe::egui;
use forecast_client::Coordinate;
use walkers::{lon_lat, MapMemory, Plugin, Projector};

const MARKER_FILL: egui::Color32 = egui::Color32::from_rgb(40, 120, 220);
const MARKER_OUTLINE: egui::Color32 = egui::Color32::from_rgb(20, 60, 120);
const MARKER_HEAD_RADIUS: f32 = 9.0;
const MARKER_HEIGHT: f32 = 26.0;

/// Click capture and marker rendering for one frame.
#[derive(Debug)]
pub struct ClickLayer<'a> {
    marker: Option<Coordinate>,
    clicked_at: &'a mut Option<(f64, f64)>,
}

impl<'a> ClickLayer<'a> {
    /// `clicked_at` receives the raw `(lat, lon)` of a primary click, if any.
    pub fn new(marker: Option<Coordinate>, clicked_at: &'a mut Option<(f64, f64)>) -> Self {
        Self { marker, clicked_at }
    }
}

impl Plugin for ClickLayer<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _map_memory: &MapMemory,
    ) {
        // A drag that ends on the map also reports a click; ignore those.
        if !response.changed() && response.clicked_by(egui::PointerButton::Primary) {
            if let Some(pointer) = response.interact_pointer_pos() {
                let position = projector.unproject(pointer - response.rect.center());
                *self.clicked_at = Some((position.y(), position.x()));
            }
        }

        if let Some(marker) = self.marker {
            let tip = projector
                .project(lon_lat(marker.longitude(), marker.latitude()))
                .to_pos2();
            if response.rect.contains(tip) {
                draw_pin(ui.painter(), tip);
            }
        }
    }
}

/// Pin with its tip on the marked location
fn draw_pin(painter: &egui::Painter, tip: egui::Pos2) {
    let head = tip - egui::vec2(0.0, MARKER_HEIGHT - MARKER_HEAD_RADIUS);
    let stroke = egui::Stroke::new(2.0, MARKER_OUTLINE);

    painter.add(egui::Shape::convex_polygon(
        vec![
            head + egui::vec2(-MARKER_HEAD_RADIUS * 0.7, MARKER_HEAD_RADIUS * 0.6),
            head + egui::vec2(MARKER_HEAD_RADIUS * 0.7, MARKER_HEAD_RADIUS * 0.6),
            tip,
        ],
        MARKER_FILL,
        stroke,
    ));
    painter.circle_filled(head, MARKER_HEAD_RADIUS, MARKER_FILL);
    painter.circle_stroke(head, MARKER_HEAD_RADIUS, stroke);
    painter.circle_filled(head, MARKER_HEAD_RADIUS * 0.35, egui::Color32::WHITE);
}
