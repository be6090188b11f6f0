//! Pointer script loader.
//!
//! A pointer script is a RON list of [`PointerEvent`] values recorded from (or
//! written for) a cursor source, replayed against a map without a renderer.

use std::path::Path;

use tilemap_core::PointerEvent;

use crate::loaders::{LoadResult, read_file};

/// Loader for recorded pointer event sequences.
pub struct PointerScriptLoader;

impl PointerScriptLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<PointerEvent>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid pointer script {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<PointerEvent>> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse pointer RON: {}", e))
    }
}
