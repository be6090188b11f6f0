//! Pointer-to-tile event routing.
//!
//! [`TileInteract`] receives world-space hit samples from an external cursor or
//! raycast source, resolves them to tiles on its assigned map and emits
//! `click`, `hover` and `unhover` events.
//!
//! Hover tracking compares tile identity ([`TileHandle`]), not tile contents:
//! replacing a tile under a stationary pointer produces an unhover/hover pair,
//! editing it in place does not. The `unhover` payload is re-read from the map
//! while the hovered slot is unchanged, so in-place edits made after the hover
//! are visible to unhover listeners. A tile that was replaced or removed is
//! reported as it was when hovered.
//!
//! Routing and emission are separate steps. [`TileInteract::dispatch_shared`]
//! routes with the interaction source borrowed, releases it, and only then runs
//! listeners, so a listener may read or reconfigure the source it is subscribed
//! to. Listeners must not subscribe or unsubscribe while an event is running.

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use arrayvec::ArrayVec;
use tracing::{trace, warn};

use crate::cell::{TilePos, WorldPos};
use crate::emitter::Emitter;
use crate::error::{InteractError, MapError};
use crate::tilemap::{TileHandle, Tilemap};

/// Tilemap shared between its owner and any number of readers.
pub type SharedTilemap<T> = Rc<RefCell<Tilemap<T>>>;

/// Interaction source shared between a map owner and the host's pointer feed.
pub type SharedInteract<T> = Rc<RefCell<TileInteract<T>>>;

/// Physical source of a pointer sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerDevice {
    Mouse,
    Touch,
    /// Tracked XR controller ray. Not routed.
    XrController,
}

impl PointerDevice {
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::XrController)
    }
}

/// Plane the tilemap lies in, used to project 3D hit points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitPlane {
    /// Map axes are world X and Y.
    #[default]
    XY,
    /// Map axes are world X and Z (ground plane).
    XZ,
}

impl HitPlane {
    pub fn project(self, point: [f64; 3]) -> WorldPos {
        match self {
            Self::XY => WorldPos::new(point[0], point[1]),
            Self::XZ => WorldPos::new(point[0], point[2]),
        }
    }
}

/// World-space hit reported by a pointer source.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerHit {
    pub device: PointerDevice,
    pub point: [f64; 3],
}

impl PointerHit {
    pub const fn new(device: PointerDevice, point: [f64; 3]) -> Self {
        Self { device, point }
    }

    /// Mouse hit on the `z = 0` plane.
    pub const fn mouse(x: f64, y: f64) -> Self {
        Self::new(PointerDevice::Mouse, [x, y, 0.0])
    }
}

/// Inbound pointer notification.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerEvent {
    Moved(PointerHit),
    Clicked(PointerHit),
    /// The pointer no longer hits the map surface at all.
    Left,
}

/// Tile-domain event produced by routing one pointer sample.
#[derive(Clone, Debug, PartialEq)]
pub enum TileEvent<T> {
    Click(Option<T>),
    Hover(T),
    Unhover(T),
}

/// One pointer sample yields at most an unhover followed by a hover.
pub type RoutedEvents<T> = ArrayVec<TileEvent<T>, 2>;

struct Listeners<T> {
    clicks: Emitter<Option<T>>,
    hovers: Emitter<T>,
    unhovers: Emitter<T>,
}

impl<T> Listeners<T> {
    fn fire(&mut self, events: &RoutedEvents<T>) {
        for event in events {
            match event {
                TileEvent::Click(tile) => self.clicks.emit(tile),
                TileEvent::Hover(tile) => self.hovers.emit(tile),
                TileEvent::Unhover(tile) => self.unhovers.emit(tile),
            }
        }
    }
}

/// Routes pointer samples into tile events against one assigned map.
pub struct TileInteract<T> {
    map: Option<SharedTilemap<T>>,
    plane: HitPlane,
    previous_hovered: Option<(TileHandle, T)>,
    listeners: Rc<RefCell<Listeners<T>>>,
}

impl<T> Default for TileInteract<T> {
    fn default() -> Self {
        Self {
            map: None,
            plane: HitPlane::default(),
            previous_hovered: None,
            listeners: Rc::new(RefCell::new(Listeners {
                clicks: Emitter::new(),
                hovers: Emitter::new(),
                unhovers: Emitter::new(),
            })),
        }
    }
}

impl<T> TileInteract<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(map: SharedTilemap<T>) -> Self {
        let mut interact = Self::new();
        interact.set_map(Some(map));
        interact
    }

    pub fn map(&self) -> Option<&SharedTilemap<T>> {
        self.map.as_ref()
    }

    /// Assigns (or clears) the map. Hover tracking restarts without emitting
    /// an unhover for the previous map's tile.
    pub fn set_map(&mut self, map: Option<SharedTilemap<T>>) {
        self.map = map;
        self.previous_hovered = None;
    }

    pub fn hit_plane(&self) -> HitPlane {
        self.plane
    }

    pub fn set_hit_plane(&mut self, plane: HitPlane) {
        self.plane = plane;
    }

    /// Tile under the pointer as of the last routed sample. Inside a hover
    /// listener this is already the newly hovered tile.
    pub fn hovered_tile(&self) -> Option<&T> {
        self.previous_hovered.as_ref().map(|(_, tile)| tile)
    }

    /// `click` listeners. The payload is `None` when the click hit no tile.
    pub fn clicks(&self) -> RefMut<'_, Emitter<Option<T>>> {
        RefMut::map(self.listeners.borrow_mut(), |l| &mut l.clicks)
    }

    pub fn hovers(&self) -> RefMut<'_, Emitter<T>> {
        RefMut::map(self.listeners.borrow_mut(), |l| &mut l.hovers)
    }

    pub fn unhovers(&self) -> RefMut<'_, Emitter<T>> {
        RefMut::map(self.listeners.borrow_mut(), |l| &mut l.unhovers)
    }

    /// Runs the listeners for already routed events.
    pub fn emit(&self, events: &RoutedEvents<T>) {
        self.listeners.borrow_mut().fire(events);
    }
}

impl<T: Clone> TileInteract<T> {
    /// Routes and emits a sample on a shared interaction source. The source is
    /// not borrowed while listeners run.
    pub fn dispatch_shared(this: &SharedInteract<T>, event: PointerEvent) {
        let (events, listeners) = {
            let mut interact = this.borrow_mut();
            (interact.route(event), Rc::clone(&interact.listeners))
        };
        listeners.borrow_mut().fire(&events);
    }

    pub fn dispatch(&mut self, event: PointerEvent) {
        let events = self.route(event);
        self.emit(&events);
    }

    /// Handles a pointer move. Emits `unhover` for the old tile followed by
    /// `hover` for the new one when the tile under the pointer changes.
    pub fn moved_to(&mut self, hit: PointerHit) {
        self.dispatch(PointerEvent::Moved(hit));
    }

    /// Handles a click. Always emits `click`, with `None` when no tile was hit.
    pub fn clicked_at(&mut self, hit: PointerHit) {
        self.dispatch(PointerEvent::Clicked(hit));
    }

    /// Emits `unhover` for the tracked tile, if any, and stops tracking it.
    pub fn pointer_left(&mut self) {
        self.dispatch(PointerEvent::Left);
    }

    /// Updates hover tracking for `event` and returns the events to emit,
    /// without running any listener.
    pub fn route(&mut self, event: PointerEvent) -> RoutedEvents<T> {
        let mut events = RoutedEvents::new();
        match event {
            PointerEvent::Moved(hit) => match self.resolve(&hit) {
                Ok(current) => self.transition(current, &mut events),
                Err(err) => report(err),
            },
            PointerEvent::Clicked(hit) => match self.resolve(&hit) {
                Ok(tile) => events.push(TileEvent::Click(tile.map(|(_, tile)| tile))),
                Err(err) => report(err),
            },
            PointerEvent::Left => self.transition(None, &mut events),
        }
        events
    }

    fn transition(&mut self, current: Option<(TileHandle, T)>, events: &mut RoutedEvents<T>) {
        let unchanged = match (&self.previous_hovered, &current) {
            (Some((previous, _)), Some((next, _))) => previous == next,
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        trace!(
            target: "tilemap::interact",
            from = ?self.previous_hovered.as_ref().map(|(h, _)| h.pos),
            to = ?current.as_ref().map(|(h, _)| h.pos),
            "hover transition"
        );
        if let Some((handle, snapshot)) = self.previous_hovered.take() {
            events.push(TileEvent::Unhover(self.refresh(handle).unwrap_or(snapshot)));
        }
        if let Some((_, tile)) = &current {
            events.push(TileEvent::Hover(tile.clone()));
        }
        self.previous_hovered = current;
    }

    /// Current contents of the slot behind `handle`, if it was not rewritten.
    fn refresh(&self, handle: TileHandle) -> Option<T> {
        let map = self.map.as_ref()?.borrow();
        lookup_owned(&map, handle.pos).and_then(|(live, tile)| (live == handle).then_some(tile))
    }

    /// Looks up the tile under `hit`. The map borrow ends before any event fires
    /// so listeners are free to mutate the map.
    fn resolve(&self, hit: &PointerHit) -> Result<Option<(TileHandle, T)>, InteractError> {
        if !hit.device.is_supported() {
            return Err(InteractError::UnsupportedDevice(hit.device));
        }
        let map = self.map.as_ref().ok_or(InteractError::MapNotAssigned)?;
        let map = map.borrow();
        let world = self.plane.project(hit.point);
        let Some(pos) = map.try_world_to_tile(world.x, world.y) else {
            return Ok(None);
        };
        Ok(lookup_owned(&map, pos))
    }
}

fn lookup_owned<T: Clone>(map: &Tilemap<T>, pos: TilePos) -> Option<(TileHandle, T)> {
    map.lookup(pos).map(|(handle, tile)| (handle, tile.clone()))
}

fn report(err: InteractError) {
    warn!(
        target: "tilemap::interact",
        code = err.error_code(),
        severity = err.severity().as_str(),
        "{err}; pointer sample dropped"
    );
}
