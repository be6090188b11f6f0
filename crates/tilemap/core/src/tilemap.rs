//! Grid storage with world/tile coordinate conversion.
//!
//! A [`Tilemap`] stores tiles keyed by [`TilePos`] in insertion order. Every slot
//! that was ever written stays in storage: clearing a cell leaves a tombstone so
//! the key is still enumerable through [`Tilemap::keys`], while lookups, value
//! iteration and [`Tilemap::count`] treat it as empty.
//!
//! Maps start unbounded. [`Tilemap::create_map`] fills a rectangle with default
//! tiles and from then on writes outside `[0, width) × [0, height)` are rejected.

use std::collections::HashMap;

use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::cell::{CellData, TilePos, WorldPos};
use crate::error::TilemapError;

/// Extent of a tilemap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapBounds {
    /// Accepts tiles at any coordinate.
    #[default]
    Unbounded,
    /// Fixed rectangle `[0, width) × [0, height)`; both sides are non-zero.
    Bounded { width: u32, height: u32 },
}

impl MapBounds {
    /// Bounds for a `width × height` rectangle. Zero in either axis yields
    /// [`MapBounds::Unbounded`].
    pub const fn new(width: u32, height: u32) -> Self {
        if width > 0 && height > 0 {
            Self::Bounded { width, height }
        } else {
            Self::Unbounded
        }
    }

    pub const fn is_bounded(&self) -> bool {
        matches!(self, Self::Bounded { .. })
    }

    /// Returns true when `pos` may be addressed. Unbounded maps accept everything.
    pub fn contains(&self, pos: TilePos) -> bool {
        match *self {
            Self::Unbounded => true,
            Self::Bounded { width, height } => {
                pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < width && (pos.y as u32) < height
            }
        }
    }

    /// `(width, height)`, reported as `(0, 0)` when unbounded.
    pub const fn size(&self) -> (u32, u32) {
        match *self {
            Self::Unbounded => (0, 0),
            Self::Bounded { width, height } => (width, height),
        }
    }
}

/// Neighbour directions in query order. `Up` is towards `y - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter, strum::IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    Right,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::UpLeft => (-1, -1),
            Self::Up => (0, -1),
            Self::UpRight => (1, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::DownLeft => (-1, 1),
            Self::Down => (0, 1),
            Self::DownRight => (1, 1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }
}

/// Identity of a stored tile.
///
/// Two handles are equal only if they name the same slot and no write has
/// replaced the tile in between. In-place edits through
/// [`Tilemap::modify_tile`] keep the handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileHandle {
    pub pos: TilePos,
    revision: u64,
}

#[derive(Clone, Debug)]
enum Slot<T> {
    Tombstone,
    Occupied(T),
}

#[derive(Clone, Debug)]
struct Entry<T> {
    pos: TilePos,
    revision: u64,
    slot: Slot<T>,
}

impl<T> Entry<T> {
    fn tile(&self) -> Option<&T> {
        match &self.slot {
            Slot::Occupied(tile) => Some(tile),
            Slot::Tombstone => None,
        }
    }
}

/// Rejects tile sizes that are not finite and strictly positive.
pub(crate) fn validate_tile_size(width: f64, height: f64) -> Result<(), TilemapError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(TilemapError::InvalidTileSize { width, height })
    }
}

pub(crate) fn validate_offset(x: f64, y: f64) -> Result<(), TilemapError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(TilemapError::InvalidOffset { x, y })
    }
}

/// 2D grid of tiles with world-space conversion.
#[derive(Clone, Debug)]
pub struct Tilemap<T> {
    tile_width: f64,
    tile_height: f64,
    offset: WorldPos,
    bounds: MapBounds,
    entries: Vec<Entry<T>>,
    index: HashMap<TilePos, usize>,
    next_revision: u64,
}

impl<T> Default for Tilemap<T> {
    fn default() -> Self {
        Self {
            tile_width: 1.0,
            tile_height: 1.0,
            offset: WorldPos::ORIGIN,
            bounds: MapBounds::Unbounded,
            entries: Vec::new(),
            index: HashMap::new(),
            next_revision: 0,
        }
    }
}

impl<T> Tilemap<T> {
    /// Creates an empty, unbounded map with the given cell size.
    pub fn new(tile_width: f64, tile_height: f64) -> Result<Self, TilemapError> {
        let mut map = Self::default();
        map.set_tile_size(tile_width, tile_height)?;
        Ok(map)
    }

    // ===== geometry =====

    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f64 {
        self.tile_height
    }

    pub fn offset(&self) -> WorldPos {
        self.offset
    }

    pub fn bounds(&self) -> MapBounds {
        self.bounds
    }

    pub fn is_bounded(&self) -> bool {
        self.bounds.is_bounded()
    }

    /// Width in tiles, `0` while unbounded.
    pub fn width(&self) -> u32 {
        self.bounds.size().0
    }

    /// Height in tiles, `0` while unbounded.
    pub fn height(&self) -> u32 {
        self.bounds.size().1
    }

    /// Returns true when `pos` lies inside the bounds (always true when unbounded).
    pub fn contains(&self, pos: TilePos) -> bool {
        self.bounds.contains(pos)
    }

    /// Sets the world-unit size of a cell. Stored tiles are not moved.
    pub fn set_tile_size(&mut self, width: f64, height: f64) -> Result<(), TilemapError> {
        validate_tile_size(width, height)?;
        self.tile_width = width;
        self.tile_height = height;
        Ok(())
    }

    /// Square-cell shorthand for [`Tilemap::set_tile_size`].
    pub fn set_uniform_tile_size(&mut self, size: f64) -> Result<(), TilemapError> {
        self.set_tile_size(size, size)
    }

    /// Shifts the world-space origin of tile `(0, 0)`.
    pub fn set_offset(&mut self, x: f64, y: f64) -> Result<(), TilemapError> {
        validate_offset(x, y)?;
        self.offset = WorldPos::new(x, y);
        Ok(())
    }

    /// Converts a world position to the tile containing it.
    ///
    /// Flooring means world positions left of / above the origin map to negative
    /// tiles. No bounds check is made. Non-finite input saturates (NaN becomes
    /// `0`); use [`Tilemap::try_world_to_tile`] when input may be garbage.
    pub fn world_to_tile(&self, wx: f64, wy: f64) -> TilePos {
        TilePos::new(
            ((wx - self.offset.x) / self.tile_width).floor() as i32,
            ((wy - self.offset.y) / self.tile_height).floor() as i32,
        )
    }

    /// Like [`Tilemap::world_to_tile`], but `None` for non-finite input or
    /// results outside the `i32` range.
    pub fn try_world_to_tile(&self, wx: f64, wy: f64) -> Option<TilePos> {
        let to_index = |w: f64, origin: f64, size: f64| {
            let v = ((w - origin) / size).floor();
            (v.is_finite() && v >= i32::MIN as f64 && v <= i32::MAX as f64).then_some(v as i32)
        };
        Some(TilePos::new(
            to_index(wx, self.offset.x, self.tile_width)?,
            to_index(wy, self.offset.y, self.tile_height)?,
        ))
    }

    /// World position of the cell's minimum corner.
    pub fn tile_to_world_origin(&self, x: i32, y: i32) -> WorldPos {
        WorldPos::new(
            f64::from(x) * self.tile_width + self.offset.x,
            f64::from(y) * self.tile_height + self.offset.y,
        )
    }

    /// World position of the cell's centre.
    pub fn tile_to_world_center(&self, x: i32, y: i32) -> WorldPos {
        WorldPos::new(
            (f64::from(x) + 0.5) * self.tile_width + self.offset.x,
            (f64::from(y) + 0.5) * self.tile_height + self.offset.y,
        )
    }

    /// World-space centre of the cell a stored tile occupies.
    pub fn tile_to_world_position(&self, tile: &T) -> WorldPos
    where
        T: CellData,
    {
        self.tile_to_world_center(tile.x(), tile.y())
    }

    // ===== lookup =====

    fn slot(&self, pos: TilePos) -> Option<&Entry<T>> {
        self.index.get(&pos).map(|&i| &self.entries[i])
    }

    /// Looks a tile up by canonical key. Unparsable or non-canonical keys
    /// (`"01,2"`, `"+1,2"`) yield `None`.
    /// No bounds check is made.
    pub fn get_tile_by_id(&self, id: &str) -> Option<&T> {
        let pos: TilePos = id.parse().ok()?;
        self.slot(pos)?.tile()
    }

    /// Returns the tile at `(x, y)`.
    ///
    /// Negative coordinates always yield `None`, as do coordinates outside the
    /// rectangle of a bounded map.
    pub fn get_tile(&self, x: i32, y: i32) -> Option<&T> {
        self.lookup(TilePos::new(x, y)).map(|(_, tile)| tile)
    }

    /// [`Tilemap::get_tile`] that also reports the tile's identity.
    pub fn lookup(&self, pos: TilePos) -> Option<(TileHandle, &T)> {
        if pos.x < 0 || pos.y < 0 || !self.bounds.contains(pos) {
            return None;
        }
        let entry = self.slot(pos)?;
        let handle = TileHandle {
            pos,
            revision: entry.revision,
        };
        entry.tile().map(|tile| (handle, tile))
    }

    /// True iff the cell holds a tile. Tombstones and unwritten cells are false.
    pub fn has_tile(&self, x: i32, y: i32) -> bool {
        self.slot(TilePos::new(x, y))
            .is_some_and(|entry| entry.tile().is_some())
    }

    // ===== mutation =====

    fn store(&mut self, pos: TilePos, slot: Slot<T>) {
        let revision = self.next_revision;
        self.next_revision += 1;
        match self.index.get(&pos) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.slot = slot;
                entry.revision = revision;
            }
            None => {
                self.index.insert(pos, self.entries.len());
                self.entries.push(Entry {
                    pos,
                    revision,
                    slot,
                });
            }
        }
    }

    fn insert_canonical(&mut self, pos: TilePos, mut tile: T)
    where
        T: CellData,
    {
        tile.assign_position(pos);
        self.store(pos, Slot::Occupied(tile));
    }

    /// Writes `tile` at `(x, y)`; `None` stores an explicit empty marker.
    ///
    /// The tile's `id`/`x`/`y` are overwritten with the canonical values for
    /// the cell before it is stored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Option<T>) -> Result<(), TilemapError>
    where
        T: CellData,
    {
        let pos = TilePos::new(x, y);
        if !self.bounds.contains(pos) {
            let (width, height) = self.bounds.size();
            return Err(TilemapError::OutOfBounds {
                position: pos,
                width,
                height,
            });
        }
        match tile {
            Some(tile) => self.insert_canonical(pos, tile),
            None => self.store(pos, Slot::Tombstone),
        }
        Ok(())
    }

    /// Replaces an existing slot with an empty marker and returns the tile it held.
    ///
    /// Cells that were never written are left untouched.
    pub fn remove_tile(&mut self, x: i32, y: i32) -> Option<T> {
        let Some(&i) = self.index.get(&TilePos::new(x, y)) else {
            return None;
        };
        let previous = std::mem::replace(&mut self.entries[i].slot, Slot::Tombstone);
        self.entries[i].revision = self.next_revision;
        self.next_revision += 1;
        match previous {
            Slot::Occupied(tile) => Some(tile),
            Slot::Tombstone => None,
        }
    }

    /// Edits a stored tile in place. Identity fields are re-asserted afterwards
    /// and the tile's [`TileHandle`] is unchanged. Returns false if the cell is
    /// empty.
    pub fn modify_tile<F>(&mut self, x: i32, y: i32, f: F) -> bool
    where
        T: CellData,
        F: FnOnce(&mut T),
    {
        let pos = TilePos::new(x, y);
        let Some(&i) = self.index.get(&pos) else {
            return false;
        };
        match &mut self.entries[i].slot {
            Slot::Occupied(tile) => {
                f(tile);
                tile.assign_position(pos);
                true
            }
            Slot::Tombstone => false,
        }
    }

    /// Fills `[0, width) × [0, height)` with default tiles and fixes the bounds.
    ///
    /// Rows are populated top to bottom (`y` outer, `x` inner). Slots outside the
    /// new rectangle are kept in storage but become unreachable through the
    /// bounds-checked accessors. A zero dimension leaves the map unbounded.
    pub fn create_map(&mut self, width: i32, height: i32) -> Result<(), TilemapError>
    where
        T: CellData + Default,
    {
        if width < 0 || height < 0 {
            return Err(TilemapError::NegativeDimensions {
                width: width.into(),
                height: height.into(),
            });
        }
        self.bounds = MapBounds::new(width as u32, height as u32);
        for y in 0..height {
            for x in 0..width {
                self.insert_canonical(TilePos::new(x, y), T::default());
            }
        }
        tracing::debug!(
            target: "tilemap::map",
            width,
            height,
            bounded = self.bounds.is_bounded(),
            "populated tilemap"
        );
        Ok(())
    }

    // ===== iteration =====

    /// Stored tiles in insertion order, skipping empty markers.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().filter_map(Entry::tile)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter()
    }

    /// Every key ever written, including cells that now hold an empty marker.
    pub fn keys(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.entries.iter().map(|entry| entry.pos)
    }

    /// `(x, y, tile)` for every stored tile.
    pub fn entries(&self) -> impl Iterator<Item = (i32, i32, &T)> + '_ {
        self.entries
            .iter()
            .filter_map(|entry| entry.tile().map(|tile| (entry.pos.x, entry.pos.y, tile)))
    }

    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(f);
    }

    /// Number of stored tiles. Walks the whole storage.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Occupied neighbours of `(x, y)`.
    ///
    /// Orthogonal order is up, left, right, down. With diagonals the order is
    /// up-left, up, up-right, left, right, down-left, down, down-right.
    pub fn get_neighbors(&self, x: i32, y: i32, include_diagonal: bool) -> ArrayVec<&T, 8> {
        let origin = TilePos::new(x, y);
        Direction::iter()
            .filter(|dir| include_diagonal || !dir.is_diagonal())
            .filter_map(|dir| {
                let (dx, dy) = dir.delta();
                let pos = origin.offset(dx, dy)?;
                self.get_tile(pos.x, pos.y)
            })
            .collect()
    }

    // ===== records =====

    /// Stored tiles in iteration order, borrowed from the map.
    pub fn to_records(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// Builds an unbounded map, storing each record at its own `(x, y)`.
    pub fn from_unbounded_records<I>(records: I) -> Self
    where
        T: CellData,
        I: IntoIterator<Item = T>,
    {
        let mut map = Self::default();
        for tile in records {
            let pos = tile.position();
            map.insert_canonical(pos, tile);
        }
        map
    }

    /// Rebuilds a map from records produced by [`Tilemap::to_records`].
    ///
    /// With `width > 0 && height > 0` the map is created with
    /// [`Tilemap::create_map`] and every record is written through
    /// [`Tilemap::set_tile`], so out-of-range records fail with
    /// [`TilemapError::OutOfBounds`]. Otherwise the result is unbounded.
    pub fn from_records<I>(records: I, width: i32, height: i32) -> Result<Self, TilemapError>
    where
        T: CellData + Default,
        I: IntoIterator<Item = T>,
    {
        if width <= 0 || height <= 0 {
            return Ok(Self::from_unbounded_records(records));
        }
        let mut map = Self::default();
        map.create_map(width, height)?;
        for tile in records {
            let pos = tile.position();
            map.set_tile(pos.x, pos.y, Some(tile))?;
        }
        Ok(map)
    }
}

impl<'a, T> IntoIterator for &'a Tilemap<T> {
    type Item = &'a T;
    type IntoIter = Box<dyn Iterator<Item = &'a T> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Tilemap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

/// Deserializes a record array into an unbounded map.
#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Tilemap<T>
where
    T: CellData + serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let records = <Vec<T> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Self::from_unbounded_records(records))
    }
}
