//! Map generation parameters.

use crate::cell::WorldPos;
use crate::error::TilemapError;
use crate::tilemap::{validate_offset, validate_tile_size};

/// Grid size in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// World-unit size of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSize {
    pub width: f64,
    pub height: f64,
}

impl TileSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub const fn uniform(size: f64) -> Self {
        Self::new(size, size)
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Configuration consumed by [`crate::GenerateMap`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    pub dimensions: MapDimensions,
    pub tile_size: TileSize,
    pub offset: WorldPos,
    /// Wire pointer interaction (click/hover) to the generated map.
    pub interactive: bool,
}

impl MapConfig {
    pub const DEFAULT_DIMENSIONS: MapDimensions = MapDimensions::new(10, 10);

    pub fn new(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tile_size(mut self, tile_size: TileSize) -> Self {
        self.tile_size = tile_size;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = WorldPos::new(x, y);
        self
    }

    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Checks every field against the constraints [`crate::Tilemap`] enforces.
    pub fn validate(&self) -> Result<(), TilemapError> {
        validate_tile_size(self.tile_size.width, self.tile_size.height)?;
        validate_offset(self.offset.x, self.offset.y)?;
        let MapDimensions { width, height } = self.dimensions;
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(TilemapError::DimensionsTooLarge { width, height });
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            dimensions: Self::DEFAULT_DIMENSIONS,
            tile_size: TileSize::default(),
            offset: WorldPos::ORIGIN,
            interactive: false,
        }
    }
}
