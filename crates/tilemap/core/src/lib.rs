//! Grid storage and pointer interaction for tile-based maps.
//!
//! `tilemap-core` is independent of any rendering host. It provides:
//! - [`Tilemap`]: insertion-ordered tile storage with world/tile conversion,
//!   bounded and unbounded modes, neighbour queries and record round-trips
//! - [`TileInteract`]: turns pointer hit positions into `click`, `hover` and
//!   `unhover` events
//! - [`GenerateMap`]: builds a map from a [`MapConfig`] and forwards
//!   interaction events to [`MapHooks`]
//!
//! Everything is single-threaded; shared ownership uses `Rc<RefCell<_>>`.
pub mod cell;
pub mod config;
pub mod emitter;
pub mod error;
pub mod generate;
pub mod interact;
pub mod tilemap;

pub use cell::{BasicCell, CellData, ParseKeyError, TilePos, WorldPos};
pub use config::{MapConfig, MapDimensions, TileSize};
pub use emitter::{Emitter, ListenerId};
pub use error::{ErrorSeverity, InteractError, MapError, TilemapError};
pub use generate::{GenerateMap, MapHooks};
pub use interact::{
    HitPlane, PointerDevice, PointerEvent, PointerHit, RoutedEvents, SharedInteract,
    SharedTilemap, TileEvent, TileInteract,
};
pub use tilemap::{Direction, MapBounds, TileHandle, Tilemap};
