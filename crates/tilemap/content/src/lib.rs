//! Data-driven map content.
//!
//! Loaders for the files an application keeps next to its tilemaps:
//! - Map configuration (TOML)
//! - Tile record arrays (JSON or RON)
//! - Recorded pointer scripts (RON), used to replay interaction offline
//!
//! All loaders use tilemap-core types directly with serde.

pub mod loaders;

pub use loaders::{
    ConfigLoader, LoadResult, PointerScriptLoader, RecordFormat, TileLoader, TileWriter,
};
