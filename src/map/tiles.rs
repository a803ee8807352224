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

use std::path::PathBuf;

use eframe::egui;
use walkers::sources::{Attribution, TileSource};
use walkers::{HttpOptions, HttpTiles, TileId};

/// Tile source for the standard OpenStreetMap tiles.
/// Uses subdomain load balancing across a-c.tile.openstreetmap.org
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenStreetMapSource;

impl OpenStreetMapSource {
    /// Create the tile fetcher, caching tiles under `cache` when given
    pub fn http_tiles(cache: Option<PathBuf>, ctx: &egui::Context) -> HttpTiles {
        let http_options = HttpOptions {
            cache,
            ..Default::default()
        };
        HttpTiles::with_options(Self, http_options, ctx.clone())
    }
}

impl TileSource for OpenStreetMapSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        let subdomain = ['a', 'b', 'c'][((tile_id.x + tile_id.y) % 3) as usize];

        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            subdomain, tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenStreetMap contributors",
            url: "https://www.openstreetmap.org/copyright",
            logo_light: None,
            logo_dark: None,
        }
    }
}

/// On-disk tile cache location
pub fn tile_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("forecast-map")
        .join("tiles")
        .join("openstreetmap")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_rotates_subdomains() {
        let source = OpenStreetMapSource;
        let url = source.tile_url(TileId { x: 31, y: 20, zoom: 6 });
        assert_eq!(url, "https://a.tile.openstreetmap.org/6/31/20.png");

        let url = source.tile_url(TileId { x: 32, y: 20, zoom: 6 });
        assert_eq!(url, "https://b.tile.openstreetmap.org/6/32/20.png");
    }

    #[test]
    fn test_cache_dir_is_app_scoped() {
        let path = tile_cache_dir();
        assert!(path.ends_with("forecast-map/tiles/openstreetmap"));
    }
}
