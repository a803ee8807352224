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

mod app;
mod config;
mod map;
mod ui;

use clap::Parser;
use eframe::egui;
use log::{info, warn};

use app::ForecastApp;
use config::AppConfig;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Click anywhere on the map to get tomorrow's forecast for that spot.
#[derive(Parser, Debug)]
#[command(name = "forecast-map", version, about)]
struct Args {
    /// Base URL of the forecast service
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Initial map center latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Initial map center longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Initial zoom level
    #[arg(long)]
    zoom: Option<f64>,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Hide the loading indicator when a request fails
    #[arg(long)]
    hide_loading_on_error: bool,

    /// Ignore responses for clicks older than the latest one
    #[arg(long)]
    discard_stale: bool,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    save_config: bool,

    /// Print the config file location and exit
    #[arg(long)]
    print_config_path: bool,
}

impl Args {
    /// Overlay command line options on the loaded configuration
    fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.api_base_url.clone_from(url);
        }
        if let Some(lat) = self.lat {
            config.initial_latitude = lat;
        }
        if let Some(lon) = self.lon {
            config.initial_longitude = lon;
        }
        if let Some(zoom) = self.zoom {
            config.default_zoom = zoom;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = Some(timeout);
        }
        if self.hide_loading_on_error {
            config.hide_loading_on_error = true;
        }
        if self.discard_stale {
            config.discard_stale_responses = true;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.print_config_path {
        println!("{}", AppConfig::get_config_path()?.display());
        return Ok(());
    }

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load configuration, using defaults: {e}");
        AppConfig::default()
    });
    args.apply(&mut config);

    if args.save_config {
        config.save()?;
        info!("Saved configuration to {}", AppConfig::get_config_path()?.display());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("forecast-http")
        .enable_all()
        .build()?;

    info!("Starting Forecast Map (API: {})", config.api_base_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Forecast Map"),
        ..Default::default()
    };

    eframe::run_native(
        "Forecast Map",
        options,
        Box::new(move |cc| {
            let app = ForecastApp::new(cc, &config, runtime)?;
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
