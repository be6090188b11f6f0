//! Common error infrastructure for tilemap-core.
//!
//! Each concern owns its error enum (`TilemapError` for grid storage and
//! configuration, `InteractError` for pointer routing). They share the
//! [`MapError`] trait so callers can classify failures uniformly.
//!
//! # Design Principles
//!
//! - **Fail fast**: contract violations on the map are returned immediately and
//!   never clamped or repaired
//! - **Contained usage errors**: a misconfigured interaction layer logs and skips
//!   the event instead of aborting the frame
//! - **Not-found is not an error**: lookups return `Option`

use crate::cell::TilePos;
use crate::interact::PointerDevice;

/// Severity level of an error, used for categorization and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input; the caller must change the arguments before retrying.
    ///
    /// Examples: non-positive tile size, out-of-bounds write
    Validation,

    /// Misconfiguration detected while routing events. The operation is
    /// skipped and a warning is logged.
    ///
    /// Examples: no map assigned, unsupported pointer device
    Usage,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Usage => "usage",
        }
    }

    /// Returns true if the error is contained locally (logged, not propagated).
    pub const fn is_contained(&self) -> bool {
        matches!(self, Self::Usage)
    }
}

/// Common trait for all tilemap-core errors.
pub trait MapError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and assertions in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Contract violations raised by [`crate::Tilemap`] and [`crate::MapConfig`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TilemapError {
    /// Tile size must be finite and strictly positive in both axes.
    #[error("invalid tile size {width}x{height}: both dimensions must be finite and > 0")]
    InvalidTileSize { width: f64, height: f64 },

    /// Offset must be finite in both axes.
    #[error("invalid offset ({x}, {y}): both components must be finite")]
    InvalidOffset { x: f64, y: f64 },

    /// `create_map` was called with a negative dimension.
    #[error("invalid map dimensions {width}x{height}: dimensions must be >= 0")]
    NegativeDimensions { width: i64, height: i64 },

    /// Configured dimensions do not fit the tile coordinate range.
    #[error("map dimensions {width}x{height} exceed the addressable tile range")]
    DimensionsTooLarge { width: u32, height: u32 },

    /// Write outside the rectangle of a bounded map.
    #[error("position {position} is out of bounds (map size: {width}x{height})")]
    OutOfBounds {
        position: TilePos,
        width: u32,
        height: u32,
    },
}

impl MapError for TilemapError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use TilemapError::*;
        match self {
            InvalidTileSize { .. } => "TILEMAP_INVALID_TILE_SIZE",
            InvalidOffset { .. } => "TILEMAP_INVALID_OFFSET",
            NegativeDimensions { .. } => "TILEMAP_NEGATIVE_DIMENSIONS",
            DimensionsTooLarge { .. } => "TILEMAP_DIMENSIONS_TOO_LARGE",
            OutOfBounds { .. } => "TILEMAP_OUT_OF_BOUNDS",
        }
    }
}

/// Misconfiguration of a [`crate::TileInteract`].
///
/// These never escape the interaction layer; they are logged and the incoming
/// pointer sample is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InteractError {
    #[error("no tilemap assigned to tile interaction")]
    MapNotAssigned,

    #[error("pointer device {0} is not supported")]
    UnsupportedDevice(PointerDevice),
}

impl MapError for InteractError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Usage
    }

    fn error_code(&self) -> &'static str {
        match self {
            InteractError::MapNotAssigned => "INTERACT_MAP_NOT_ASSIGNED",
            InteractError::UnsupportedDevice(_) => "INTERACT_UNSUPPORTED_DEVICE",
        }
    }
}
