//! Inspector configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

use tilemap_core::HitPlane;

/// Paths and options for one inspector run.
#[derive(Clone, Debug, Default)]
pub struct InspectorConfig {
    pub map_config: Option<PathBuf>,
    pub tiles: Option<PathBuf>,
    pub pointer_script: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub hit_plane: HitPlane,
}

impl InspectorConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TILEMAP_CONFIG` - Map config TOML (default: built-in 10x10 interactive map)
    /// - `TILEMAP_TILES` - Tile records, `.json` or `.ron` (optional)
    /// - `TILEMAP_POINTER_SCRIPT` - Pointer events to replay, RON (optional)
    /// - `TILEMAP_OUTPUT` - Where to write the final records (optional)
    /// - `TILEMAP_LOG_DIR` - Also log to `inspector.log` in this directory (optional)
    /// - `TILEMAP_HIT_PLANE` - `xy` or `xz` (default: xy)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        let mut config = Self {
            map_config: path("TILEMAP_CONFIG"),
            tiles: path("TILEMAP_TILES"),
            pointer_script: path("TILEMAP_POINTER_SCRIPT"),
            output: path("TILEMAP_OUTPUT"),
            log_dir: path("TILEMAP_LOG_DIR"),
            hit_plane: HitPlane::default(),
        };

        if let Some(raw) = lookup("TILEMAP_HIT_PLANE") {
            match raw.parse() {
                Ok(plane) => config.hit_plane = plane,
                // logging is not up yet
                Err(_) => eprintln!("ignoring unknown TILEMAP_HIT_PLANE '{raw}'"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> InspectorConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        InspectorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]);
        assert!(config.map_config.is_none());
        assert!(config.output.is_none());
        assert_eq!(config.hit_plane, HitPlane::XY);
    }

    #[test]
    fn reads_paths_and_plane() {
        let config = config_from(&[
            ("TILEMAP_CONFIG", "maps/garden.toml"),
            ("TILEMAP_OUTPUT", ""),
            ("TILEMAP_HIT_PLANE", "XZ"),
        ]);
        assert_eq!(config.map_config, Some(PathBuf::from("maps/garden.toml")));
        assert!(config.output.is_none());
        assert_eq!(config.hit_plane, HitPlane::XZ);
    }

    #[test]
    fn unknown_plane_keeps_default() {
        let config = config_from(&[("TILEMAP_HIT_PLANE", "diagonal")]);
        assert_eq!(config.hit_plane, HitPlane::XY);
    }
}
