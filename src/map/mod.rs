//! Map rendering.
//!
//! OpenStreetMap tiles through `walkers`, plus the plugin that captures
//! clicks and draws the forecast marker.

pub mod layer;
pub mod tiles;

pub use layer::ClickLayer;
pub use tiles::{OpenStreetMapSource, tile_cache_dir};
