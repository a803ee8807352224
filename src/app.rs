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

//! Main application window.
//!
//! Wires the map, the click handler and the background dispatcher together.
//! Clicks are captured on the UI thread, requests run on the tokio runtime
//! owned by the app, and completions are applied at the start of each frame.

use eframe::egui;
use forecast_client::{ClientError, Dispatcher, HttpForecastClient, MapClickHandler, Marker};
use log::{debug, info, warn};
use walkers::sources::{Attribution, TileSource};
use walkers::{lon_lat, HttpTiles, Map, MapMemory, Position};

use crate::config::AppConfig;
use crate::map::{tile_cache_dir, ClickLayer, OpenStreetMapSource};
use crate::ui::{AlertQueue, ResultPanel};

const PANEL_WIDTH: f32 = 280.0;

pub struct ForecastApp {
    handler: MapClickHandler<AlertQueue>,
    dispatcher: Dispatcher<HttpForecastClient>,
    tiles: HttpTiles,
    map_memory: MapMemory,
    home: Position,
    api_url: String,
    // dropped last so in-flight tasks are cancelled first
    _runtime: tokio::runtime::Runtime,
}

impl std::fmt::Debug for ForecastApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastApp")
            .field("handler", &self.handler)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl ForecastApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &AppConfig,
        runtime: tokio::runtime::Runtime,
    ) -> Result<Self, ClientError> {
        let api = HttpForecastClient::new(&config.client_config())?;
        let api_url = api.endpoint().to_string();
        info!("Forecast endpoint: {api_url}");

        let repaint_ctx = cc.egui_ctx.clone();
        let dispatcher = Dispatcher::new(api, runtime.handle().clone())
            .with_waker(move || repaint_ctx.request_repaint());

        let handler = MapClickHandler::with_options(AlertQueue::new(), config.handler_options());

        let cache = config.tile_cache.then(tile_cache_dir);
        let tiles = OpenStreetMapSource::http_tiles(cache, &cc.egui_ctx);

        let mut map_memory = MapMemory::default();
        if map_memory.set_zoom(config.default_zoom).is_err() {
            warn!("Ignoring invalid zoom level {}", config.default_zoom);
        }

        Ok(Self {
            handler,
            dispatcher,
            tiles,
            map_memory,
            home: lon_lat(config.initial_longitude, config.initial_latitude),
            api_url,
            _runtime: runtime,
        })
    }

    fn apply_completions(&mut self) {
        let applied = self.dispatcher.drain_into(&mut self.handler);
        if !applied.is_empty() {
            debug!("Applied {} forecast completion(s): {applied:?}", applied.len());
        }
    }
}

impl eframe::App for ForecastApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_completions();

        egui::SidePanel::right("forecast_panel")
            .resizable(false)
            .exact_width(PANEL_WIDTH)
            .show(ctx, |ui| {
                ResultPanel::new(self.handler.state(), self.handler.display(), &self.api_url)
                    .show(ui);
            });

        let mut clicked_at = None;
        let attribution = OpenStreetMapSource.attribution();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let marker = self.handler.marker().map(Marker::position);
                let layer = ClickLayer::new(marker, &mut clicked_at);

                let map = Map::new(Some(&mut self.tiles), &mut self.map_memory, self.home)
                    .with_plugin(layer);
                let response = ui.add(map);

                draw_attribution(ui, response.rect, &attribution);
            });

        if let Some((latitude, longitude)) = clicked_at {
            let ticket = self.handler.click(latitude, longitude);
            self.dispatcher.dispatch(ticket);
        }

        self.handler.notifier_mut().show(ctx);
    }
}

/// Tile attribution in the bottom-left corner of the map, linking to its source
fn draw_attribution(ui: &mut egui::Ui, map_rect: egui::Rect, attribution: &Attribution) {
    let rect = egui::Rect::from_min_size(
        map_rect.left_bottom() + egui::vec2(8.0, -24.0),
        egui::vec2(200.0, 18.0),
    );

    let text = egui::RichText::new(attribution.text)
        .size(11.0)
        .color(egui::Color32::from_black_alpha(200))
        .background_color(egui::Color32::from_white_alpha(180));

    let link = ui.put(rect, egui::Label::new(text).sense(egui::Sense::click()));
    if link.clicked() {
        if let Err(e) = webbrowser::open(attribution.url) {
            warn!("Failed to open {}: {e}", attribution.url);
        }
    }
    link.on_hover_cursor(egui::CursorIcon::PointingHand);
}
