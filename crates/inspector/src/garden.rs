//! Tile payload and hooks used by the inspector.
use serde::{Deserialize, Serialize};
use tilemap_core::{CellData, MapHooks, TilePos};
use tracing::info;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Grass,
    Soil,
    Water,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GardenTile {
    pub id: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub watered: bool,
}

impl CellData for GardenTile {
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

/// Logs every interaction and queues clicked soil tiles for watering.
#[derive(Debug, Default)]
pub struct GardenHooks {
    pub hovers: usize,
    pub unhovers: usize,
    pub clicks: usize,
    pub empty_clicks: usize,
    pub to_water: Vec<TilePos>,
}

impl MapHooks<GardenTile> for GardenHooks {
    fn on_tile_click(&mut self, tile: Option<&GardenTile>) {
        self.clicks += 1;
        let Some(tile) = tile else {
            self.empty_clicks += 1;
            info!(target: "inspector", "click on empty cell");
            return;
        };
        info!(target: "inspector", tile = %tile.id, terrain = ?tile.terrain, "click");
        if tile.terrain == Terrain::Soil && !tile.watered {
            self.to_water.push(tile.position());
        }
    }

    fn on_tile_hover(&mut self, tile: &GardenTile) {
        self.hovers += 1;
        info!(target: "inspector", tile = %tile.id, "hover");
    }

    fn on_tile_unhover(&mut self, tile: &GardenTile) {
        self.unhovers += 1;
        info!(target: "inspector", tile = %tile.id, "unhover");
    }
}
