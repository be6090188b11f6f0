//! Tile coordinates, world positions and the [`CellData`] contract.

use std::fmt;
use std::str::FromStr;

/// Discrete grid position expressed in tile coordinates.
///
/// The canonical key of a cell is the `Display` form `"x,y"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the canonical storage key for this position.
    pub fn key(self) -> String {
        self.to_string()
    }

    /// Returns the position shifted by the given delta, or `None` on overflow.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for TilePos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Error returned when a string is not a canonical `"x,y"` key.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a canonical tile key")]
pub struct ParseKeyError(pub String);

impl FromStr for TilePos {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseKeyError(s.to_owned());
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.parse().map_err(|_| invalid())?;
        let y = y.parse().map_err(|_| invalid())?;
        let pos = Self::new(x, y);
        // signs, padding and leading zeros name a different key
        if pos.key() != s {
            return Err(invalid());
        }
        Ok(pos)
    }
}

/// Continuous position in world units on the map plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
}

impl WorldPos {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Minimum shape every tile payload stored in a [`crate::Tilemap`] must have.
///
/// The map owns the identity fields: whenever a tile is stored, the map calls
/// [`CellData::assign_position`] with the cell it is written to, so any
/// `id`/`x`/`y` set by the caller beforehand is overwritten.
pub trait CellData {
    /// Canonical key of the cell this tile lives in (`"x,y"`).
    fn id(&self) -> &str;

    fn x(&self) -> i32;

    fn y(&self) -> i32;

    /// Rewrites `id`, `x` and `y` for the given cell.
    fn assign_position(&mut self, pos: TilePos);

    fn position(&self) -> TilePos {
        TilePos::new(self.x(), self.y())
    }
}

/// Tile with no payload beyond its identity fields.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicCell {
    pub id: String,
    pub x: i32,
    pub y: i32,
}

impl BasicCell {
    pub fn at(pos: TilePos) -> Self {
        let mut cell = Self::default();
        cell.assign_position(pos);
        cell
    }
}

impl CellData for BasicCell {
    fn id(&self) -> &str {
        &self.id
    }

    fn x(&self) -> i32 {
        self.x
    }

    fn y(&self) -> i32 {
        self.y
    }

    fn assign_position(&mut self, pos: TilePos) {
        self.id = pos.key();
        self.x = pos.x;
        self.y = pos.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_from_str() {
        let pos = TilePos::new(-4, 17);
        assert_eq!(pos.key(), "-4,17");
        assert_eq!("-4,17".parse::<TilePos>(), Ok(pos));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!("4".parse::<TilePos>().is_err());
        assert!("a,b".parse::<TilePos>().is_err());
        assert!("1,2,3".parse::<TilePos>().is_err());
        assert!("1.5,2".parse::<TilePos>().is_err());
    }

    #[test]
    fn non_canonical_keys_are_rejected() {
        for key in ["01,2", "+1,2", "1,+2", "1, 2", " 1,2", "-0,0", "1,02"] {
            assert!(key.parse::<TilePos>().is_err(), "{key} parsed");
        }
        assert_eq!("-1,20".parse(), Ok(TilePos::new(-1, 20)));
    }

    #[test]
    fn assign_position_overwrites_identity() {
        let mut cell = BasicCell {
            id: "bogus".into(),
            x: 99,
            y: -99,
        };
        cell.assign_position(TilePos::new(2, 3));
        assert_eq!(cell, BasicCell::at(TilePos::new(2, 3)));
        assert_eq!(cell.id(), "2,3");
    }
}
