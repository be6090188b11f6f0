//! Map construction and pointer replay.
use anyhow::{Context, Result};
use tilemap_content::{ConfigLoader, PointerScriptLoader, TileLoader, TileWriter};
use tilemap_core::{CellData, GenerateMap, MapConfig, TilePos};
use tracing::{info, warn};

use crate::config::InspectorConfig;
use crate::garden::{GardenHooks, GardenTile};

/// Outcome of one replay.
#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub events: usize,
    pub hovers: usize,
    pub unhovers: usize,
    pub clicks: usize,
    pub empty_clicks: usize,
    pub watered: Vec<TilePos>,
}

pub fn run(config: &InspectorConfig) -> Result<ReplaySummary> {
    let map_config = match &config.map_config {
        Some(path) => ConfigLoader::load(path)?,
        None => MapConfig::default().interactive(true),
    };
    if !map_config.interactive {
        warn!(target: "inspector", "map config is not interactive; pointer events will be ignored");
    }

    let mut garden = GenerateMap::new(map_config, GardenHooks::default())
        .context("Failed to generate map")?;

    if let Some(path) = &config.tiles {
        let records: Vec<GardenTile> = TileLoader::load_records(path)?;
        let mut map = garden.tilemap().borrow_mut();
        for record in records {
            let pos = record.position();
            map.set_tile(pos.x, pos.y, Some(record))
                .with_context(|| format!("Tile {} in {}", pos, path.display()))?;
        }
        info!(target: "inspector", tiles = map.count(), "applied tile records");
    }

    if let Some(interact) = garden.interact() {
        interact.borrow_mut().set_hit_plane(config.hit_plane);
    }
    garden.enable();

    let events = match &config.pointer_script {
        Some(path) => PointerScriptLoader::load(path)?,
        None => {
            info!(target: "inspector", "no pointer script configured");
            Vec::new()
        }
    };
    for event in &events {
        garden.handle_pointer(*event);
    }
    garden.disable();

    let to_water = std::mem::take(&mut garden.hooks_mut().to_water);
    let mut watered = Vec::new();
    {
        let mut map = garden.tilemap().borrow_mut();
        for pos in to_water {
            if map.modify_tile(pos.x, pos.y, |tile| tile.watered = true) {
                watered.push(pos);
            }
        }
    }

    if let Some(path) = &config.output {
        TileWriter::write(&garden.tilemap().borrow(), path)?;
        info!(target: "inspector", path = %path.display(), "wrote tile records");
    }

    let hooks = garden.hooks();
    Ok(ReplaySummary {
        events: events.len(),
        hovers: hooks.hovers,
        unhovers: hooks.unhovers,
        clicks: hooks.clicks,
        empty_clicks: hooks.empty_clicks,
        watered,
    })
}
