use std::cell::RefCell;
use std::rc::Rc;

use tilemap_core::{
    BasicCell, CellData, GenerateMap, MapConfig, MapDimensions, MapHooks, PointerEvent,
    PointerHit, TileInteract, TilePos, Tilemap, TileSize,
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Crop {
    id: String,
    x: i32,
    y: i32,
    stage: u8,
}

impl CellData for Crop {
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

#[test]
fn hover_sequence_on_two_by_two_map() {
    let mut map = Tilemap::<BasicCell>::default();
    map.create_map(2, 2).unwrap();
    let map = Rc::new(RefCell::new(map));

    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let mut interact = TileInteract::with_map(Rc::clone(&map));
    let hovers = Rc::clone(&log);
    interact
        .hovers()
        .add(move |t: &BasicCell| hovers.borrow_mut().push(format!("hover({})", t.id)));
    let unhovers = Rc::clone(&log);
    interact
        .unhovers()
        .add(move |t: &BasicCell| unhovers.borrow_mut().push(format!("unhover({})", t.id)));

    // tile(0,0), tile(0,0) again, tile(1,0), off-grid
    for (x, y) in [(0.5, 0.5), (0.5, 0.5), (1.5, 0.5), (3.5, 0.5)] {
        interact.moved_to(PointerHit::mouse(x, y));
    }

    assert_eq!(
        *log.borrow(),
        vec!["hover(0,0)", "unhover(0,0)", "hover(1,0)", "unhover(1,0)"]
    );
}

#[derive(Default)]
struct Farm {
    watered: Vec<TilePos>,
    misses: usize,
}

impl MapHooks<Crop> for Farm {
    fn on_tile_click(&mut self, tile: Option<&Crop>) {
        match tile {
            Some(crop) => self.watered.push(crop.position()),
            None => self.misses += 1,
        }
    }
}

#[test]
fn generated_map_with_custom_payload() {
    let config = MapConfig::new(MapDimensions::new(3, 3))
        .with_tile_size(TileSize::uniform(2.0))
        .with_offset(1.0, 1.0)
        .interactive(true);
    let mut farm = GenerateMap::<Crop, _>::new(config, Farm::default()).unwrap();
    farm.enable();

    farm.tilemap()
        .borrow_mut()
        .set_tile(
            2,
            2,
            Some(Crop {
                stage: 3,
                ..Crop::default()
            }),
        )
        .unwrap();
    farm.tilemap().borrow_mut().remove_tile(0, 0);

    for (x, y) in [(6.0, 6.0), (1.0, 1.0), (0.9, 0.9), (3.5, 1.2)] {
        farm.handle_pointer(PointerEvent::Clicked(PointerHit::mouse(x, y)));
    }

    let hooks = farm.hooks();
    assert_eq!(hooks.watered, vec![TilePos::new(2, 2), TilePos::new(1, 0)]);
    assert_eq!(hooks.misses, 2);
    drop(hooks);

    let map = farm.tilemap().borrow();
    assert_eq!(map.get_tile(2, 2).unwrap().stage, 3);
    assert_eq!(map.get_neighbors(1, 1, false).len(), 4);
    assert_eq!(map.get_neighbors(1, 1, true).len(), 7);
}

#[test]
fn bounds_enforcement_after_create_map() {
    let mut map = Tilemap::<Crop>::new(0.5, 0.5).unwrap();
    map.set_tile(-4, 100, Some(Crop::default())).unwrap();

    map.create_map(5, 4).unwrap();
    for x in -2..8 {
        for y in -2..7 {
            let inside = (0..5).contains(&x) && (0..4).contains(&y);
            assert_eq!(map.set_tile(x, y, Some(Crop::default())).is_ok(), inside);
            assert_eq!(map.get_tile(x, y).is_some(), inside);
        }
    }
    // written while unbounded, still reachable by id
    assert!(map.get_tile_by_id("-4,100").is_some());
    assert_eq!(map.count(), 21);
}
