//! Map generation and interaction wiring.
//!
//! [`GenerateMap`] owns a [`Tilemap`] built from a [`MapConfig`] and, for
//! interactive maps, subscribes to a [`TileInteract`] so pointer events reach
//! the [`MapHooks`] supplied by game logic.
//!
//! Lifecycle is explicit: construct with [`GenerateMap::new`] (or
//! [`GenerateMap::with_interact`] to reuse an existing interaction source),
//! then [`GenerateMap::enable`] / [`GenerateMap::disable`] as the owner becomes
//! active or inactive.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use tracing::debug;

use crate::cell::CellData;
use crate::config::MapConfig;
use crate::emitter::ListenerId;
use crate::error::TilemapError;
use crate::interact::{PointerEvent, SharedInteract, SharedTilemap, TileInteract};
use crate::tilemap::Tilemap;

/// Extension points invoked for pointer events on an interactive map.
///
/// Every hook defaults to a no-op. Panics raised by a hook propagate to the
/// caller that delivered the pointer sample.
///
/// Hooks run after the interaction source and the map have been released, so a
/// hook may hold a [`SharedInteract`] or [`SharedTilemap`] and borrow either.
/// Enabling or disabling a [`GenerateMap`] from inside a hook is not supported.
pub trait MapHooks<T> {
    /// `tile` is `None` when the click landed on an empty or off-grid cell.
    fn on_tile_click(&mut self, tile: Option<&T>) {
        let _ = tile;
    }

    fn on_tile_hover(&mut self, tile: &T) {
        let _ = tile;
    }

    fn on_tile_unhover(&mut self, tile: &T) {
        let _ = tile;
    }
}

impl<T> MapHooks<T> for () {}

struct Dispatch<T, H> {
    hooks: H,
    hovered: Option<T>,
}

#[derive(Clone, Copy, Debug)]
struct Subscriptions {
    click: ListenerId,
    hover: ListenerId,
    unhover: ListenerId,
}

/// Owner of a generated tilemap and its interaction wiring.
pub struct GenerateMap<T, H> {
    config: MapConfig,
    tilemap: SharedTilemap<T>,
    interact: Option<SharedInteract<T>>,
    dispatch: Rc<RefCell<Dispatch<T, H>>>,
    subscriptions: Option<Subscriptions>,
}

impl<T, H> GenerateMap<T, H>
where
    T: CellData + Default + Clone + 'static,
    H: MapHooks<T> + 'static,
{
    /// Builds the map described by `config`. Interactive maps get a fresh
    /// [`TileInteract`] bound to the new map.
    pub fn new(config: MapConfig, hooks: H) -> Result<Self, TilemapError> {
        Self::build(config, hooks, None)
    }

    /// Like [`GenerateMap::new`], but binds `interact` instead of creating one.
    /// `interact` is ignored when the config is not interactive.
    pub fn with_interact(
        config: MapConfig,
        hooks: H,
        interact: SharedInteract<T>,
    ) -> Result<Self, TilemapError> {
        Self::build(config, hooks, Some(interact))
    }

    fn build(
        config: MapConfig,
        hooks: H,
        existing: Option<SharedInteract<T>>,
    ) -> Result<Self, TilemapError> {
        config.validate()?;

        let mut map = Tilemap::new(config.tile_size.width, config.tile_size.height)?;
        map.set_offset(config.offset.x, config.offset.y)?;
        // validate() guarantees both dimensions fit in i32
        map.create_map(
            config.dimensions.width as i32,
            config.dimensions.height as i32,
        )?;
        let tilemap = Rc::new(RefCell::new(map));

        let interact = if config.interactive {
            let interact =
                existing.unwrap_or_else(|| Rc::new(RefCell::new(TileInteract::new())));
            interact.borrow_mut().set_map(Some(Rc::clone(&tilemap)));
            Some(interact)
        } else {
            None
        };

        debug!(
            target: "tilemap::generate",
            width = config.dimensions.width,
            height = config.dimensions.height,
            interactive = config.interactive,
            "generated map"
        );

        Ok(Self {
            config,
            tilemap,
            interact,
            dispatch: Rc::new(RefCell::new(Dispatch {
                hooks,
                hovered: None,
            })),
            subscriptions: None,
        })
    }

    /// Subscribes the hook handlers to the interaction source. No-op for
    /// non-interactive maps or when already enabled.
    pub fn enable(&mut self) {
        let Some(interact) = &self.interact else {
            return;
        };
        if self.subscriptions.is_some() {
            return;
        }
        let interact = interact.borrow();

        let dispatch = Rc::clone(&self.dispatch);
        let click = interact.clicks().add(move |tile: &Option<T>| {
            dispatch.borrow_mut().hooks.on_tile_click(tile.as_ref());
        });

        let dispatch = Rc::clone(&self.dispatch);
        let hover = interact.hovers().add(move |tile: &T| {
            let mut dispatch = dispatch.borrow_mut();
            let dispatch = &mut *dispatch;
            dispatch.hovered = Some(tile.clone());
            dispatch.hooks.on_tile_hover(tile);
        });

        let dispatch = Rc::clone(&self.dispatch);
        let unhover = interact.unhovers().add(move |tile: &T| {
            let mut dispatch = dispatch.borrow_mut();
            let dispatch = &mut *dispatch;
            dispatch.hovered = None;
            dispatch.hooks.on_tile_unhover(tile);
        });

        self.subscriptions = Some(Subscriptions {
            click,
            hover,
            unhover,
        });
        debug!(target: "tilemap::generate", "subscribed to tile interaction");
    }

    /// Forwards a pointer sample to the bound interaction source.
    pub fn handle_pointer(&self, event: PointerEvent) {
        match &self.interact {
            Some(interact) => TileInteract::dispatch_shared(interact, event),
            None => debug!(
                target: "tilemap::generate",
                ?event,
                "pointer event ignored by non-interactive map"
            ),
        }
    }
}

impl<T, H> GenerateMap<T, H> {
    /// Removes the hook handlers registered by [`GenerateMap::enable`].
    pub fn disable(&mut self) {
        let (Some(interact), Some(subscriptions)) = (&self.interact, self.subscriptions.take())
        else {
            return;
        };
        let interact = interact.borrow();
        interact.clicks().remove(subscriptions.click);
        interact.hovers().remove(subscriptions.hover);
        interact.unhovers().remove(subscriptions.unhover);
        debug!(target: "tilemap::generate", "unsubscribed from tile interaction");
    }

    pub fn is_enabled(&self) -> bool {
        self.subscriptions.is_some()
    }

    pub fn is_interactive(&self) -> bool {
        self.interact.is_some()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn tilemap(&self) -> &SharedTilemap<T> {
        &self.tilemap
    }

    pub fn interact(&self) -> Option<&SharedInteract<T>> {
        self.interact.as_ref()
    }

    /// Tile under the pointer, tracked from hover/unhover events.
    pub fn hovered_tile(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.dispatch.borrow(), |d| d.hovered.as_ref()).ok()
    }

    pub fn hooks(&self) -> Ref<'_, H> {
        Ref::map(self.dispatch.borrow(), |d| &d.hooks)
    }

    pub fn hooks_mut(&self) -> RefMut<'_, H> {
        RefMut::map(self.dispatch.borrow_mut(), |d| &mut d.hooks)
    }
}

impl<T, H> Drop for GenerateMap<T, H> {
    fn drop(&mut self) {
        self.disable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{BasicCell, TilePos};
    use crate::config::{MapDimensions, TileSize};
    use crate::interact::{HitPlane, PointerHit};

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl MapHooks<BasicCell> for Recorder {
        fn on_tile_click(&mut self, tile: Option<&BasicCell>) {
            let id = tile.map_or("none", |t| t.id.as_str());
            self.events.push(format!("click {id}"));
        }

        fn on_tile_hover(&mut self, tile: &BasicCell) {
            self.events.push(format!("hover {}", tile.id));
        }

        fn on_tile_unhover(&mut self, tile: &BasicCell) {
            self.events.push(format!("unhover {}", tile.id));
        }
    }

    fn interactive(width: u32, height: u32) -> GenerateMap<BasicCell, Recorder> {
        let config = MapConfig::new(MapDimensions::new(width, height)).interactive(true);
        GenerateMap::new(config, Recorder::default()).unwrap()
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Moved(PointerHit::mouse(x, y))
    }

    fn clicked(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Clicked(PointerHit::mouse(x, y))
    }

    #[test]
    fn builds_map_from_config() {
        let config = MapConfig::new(MapDimensions::new(4, 3))
            .with_tile_size(TileSize::new(2.0, 0.5))
            .with_offset(-1.0, 3.0);
        let generated = GenerateMap::<BasicCell, ()>::new(config, ()).unwrap();

        let map = generated.tilemap().borrow();
        assert_eq!((map.width(), map.height()), (4, 3));
        assert_eq!(map.count(), 12);
        assert_eq!((map.tile_width(), map.tile_height()), (2.0, 0.5));
        assert_eq!(map.world_to_tile(-1.0, 3.0), TilePos::ORIGIN);
        assert!(!generated.is_interactive());
    }

    #[test]
    fn rejects_invalid_config() {
        let config = MapConfig::default().with_tile_size(TileSize::uniform(-1.0));
        assert!(GenerateMap::<BasicCell, ()>::new(config, ()).is_err());
    }

    #[test]
    fn routes_events_to_hooks_once_enabled() {
        let mut generated = interactive(2, 2);
        generated.handle_pointer(clicked(0.5, 0.5));
        assert!(generated.hooks().events.is_empty());

        generated.enable();
        generated.handle_pointer(moved(0.5, 0.5));
        assert_eq!(generated.hovered_tile().unwrap().id, "0,0");
        generated.handle_pointer(moved(1.5, 0.5));
        generated.handle_pointer(clicked(1.5, 0.5));
        generated.handle_pointer(moved(9.0, 9.0));
        assert!(generated.hovered_tile().is_none());
        generated.handle_pointer(clicked(9.0, 9.0));

        assert_eq!(
            generated.hooks().events,
            vec![
                "hover 0,0",
                "unhover 0,0",
                "hover 1,0",
                "click 1,0",
                "unhover 1,0",
                "click none"
            ]
        );
    }

    #[test]
    fn enable_disable_cycles_do_not_leak_handlers() {
        let mut generated = interactive(2, 2);
        for _ in 0..3 {
            generated.enable();
            generated.enable();
            generated.disable();
            generated.disable();
        }
        generated.enable();
        {
            let interact = generated.interact().unwrap();
            let interact = interact.borrow();
            assert_eq!(interact.clicks().len(), 1);
            assert_eq!(interact.hovers().len(), 1);
            assert_eq!(interact.unhovers().len(), 1);
        }

        generated.handle_pointer(clicked(0.5, 0.5));
        assert_eq!(generated.hooks().events, vec!["click 0,0"]);

        generated.disable();
        generated.handle_pointer(clicked(0.5, 0.5));
        assert_eq!(generated.hooks().events.len(), 1);
    }

    #[test]
    fn reuses_existing_interaction_source() {
        let shared: SharedInteract<BasicCell> = Rc::new(RefCell::new(TileInteract::new()));
        let config = MapConfig::new(MapDimensions::new(2, 2)).interactive(true);
        let mut generated =
            GenerateMap::with_interact(config, Recorder::default(), Rc::clone(&shared)).unwrap();
        generated.enable();

        // the host feeds the shared source directly
        shared.borrow_mut().clicked_at(PointerHit::mouse(0.5, 1.5));
        assert_eq!(generated.hooks().events, vec!["click 0,1"]);
        assert!(Rc::ptr_eq(
            shared.borrow().map().unwrap(),
            generated.tilemap()
        ));
    }

    #[test]
    fn dropping_unsubscribes_from_shared_source() {
        let shared: SharedInteract<BasicCell> = Rc::new(RefCell::new(TileInteract::new()));
        let config = MapConfig::new(MapDimensions::new(2, 2)).interactive(true);
        let mut generated =
            GenerateMap::with_interact(config, Recorder::default(), Rc::clone(&shared)).unwrap();
        generated.enable();
        drop(generated);
        assert!(shared.borrow().clicks().is_empty());
    }

    struct Digger {
        map: SharedTilemap<BasicCell>,
    }

    impl MapHooks<BasicCell> for Digger {
        fn on_tile_click(&mut self, tile: Option<&BasicCell>) {
            if let Some(tile) = tile {
                self.map.borrow_mut().remove_tile(tile.x, tile.y);
            }
        }
    }

    #[test]
    fn hooks_may_mutate_the_map() {
        let config = MapConfig::new(MapDimensions::new(2, 2)).interactive(true);
        let placeholder = Digger {
            map: Rc::new(RefCell::new(Tilemap::default())),
        };
        let mut generated = GenerateMap::<BasicCell, _>::new(config, placeholder).unwrap();
        generated.hooks_mut().map = Rc::clone(generated.tilemap());
        generated.enable();

        generated.handle_pointer(clicked(1.5, 1.5));
        let map = generated.tilemap().borrow();
        assert!(!map.has_tile(1, 1));
        assert_eq!(map.count(), 3);
    }

    struct Lookout {
        interact: SharedInteract<BasicCell>,
        sightings: Vec<(String, Option<String>)>,
    }

    impl MapHooks<BasicCell> for Lookout {
        fn on_tile_hover(&mut self, tile: &BasicCell) {
            let interact = self.interact.borrow();
            let current = interact.hovered_tile().map(|t| t.id.clone());
            self.sightings.push((tile.id.clone(), current));
        }

        fn on_tile_click(&mut self, _tile: Option<&BasicCell>) {
            self.interact.borrow_mut().set_hit_plane(HitPlane::XZ);
        }
    }

    #[test]
    fn hooks_may_borrow_their_interaction_source() {
        let shared: SharedInteract<BasicCell> = Rc::new(RefCell::new(TileInteract::new()));
        let lookout = Lookout {
            interact: Rc::clone(&shared),
            sightings: Vec::new(),
        };
        let config = MapConfig::new(MapDimensions::new(2, 2)).interactive(true);
        let mut generated = GenerateMap::with_interact(config, lookout, Rc::clone(&shared)).unwrap();
        generated.enable();

        generated.handle_pointer(moved(0.5, 0.5));
        generated.handle_pointer(moved(1.5, 0.5));
        generated.handle_pointer(clicked(1.5, 0.5));

        assert_eq!(
            generated.hooks().sightings,
            vec![
                ("0,0".to_owned(), Some("0,0".to_owned())),
                ("1,0".to_owned(), Some("1,0".to_owned()))
            ]
        );
        assert_eq!(shared.borrow().hit_plane(), HitPlane::XZ);
    }
}
