//! Tile record loader and writer.
//!
//! Tile files hold a flat array of records, each carrying `id`, `x`, `y` and
//! the payload fields of the concrete tile type. The same shape is produced by
//! [`tilemap_core::Tilemap::to_records`].

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tilemap_core::{CellData, Tilemap};

use crate::loaders::{LoadResult, read_file};

/// On-disk encoding of a record array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Ron,
}

impl RecordFormat {
    /// Picks the format from the file extension (`.json` or `.ron`).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("ron") => Ok(Self::Ron),
            other => Err(anyhow::anyhow!(
                "Unsupported tile file extension {:?} for {}",
                other,
                path.display()
            )),
        }
    }
}

/// Loader for tile record arrays.
pub struct TileLoader;

impl TileLoader {
    /// Load raw records, format chosen by extension.
    pub fn load_records<T>(path: &Path) -> LoadResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let format = RecordFormat::from_path(path)?;
        let content = read_file(path)?;
        Self::parse_records(&content, format)
            .map_err(|e| anyhow::anyhow!("Invalid tile file {}: {}", path.display(), e))
    }

    pub fn parse_records<T>(content: &str, format: RecordFormat) -> LoadResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let records = match format {
            RecordFormat::Json => serde_json::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse tile JSON: {}", e))?,
            RecordFormat::Ron => ron::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse tile RON: {}", e))?,
        };
        Ok(records)
    }

    /// Load records into a map.
    ///
    /// With non-zero `width` and `height` the map is bounded and records outside
    /// it are rejected; otherwise every record is kept where it claims to be.
    pub fn load<T>(path: &Path, width: u32, height: u32) -> LoadResult<Tilemap<T>>
    where
        T: CellData + Default + DeserializeOwned,
    {
        let records: Vec<T> = Self::load_records(path)?;
        let count = records.len();
        let width = i32::try_from(width)?;
        let height = i32::try_from(height)?;
        let map = Tilemap::from_records(records, width, height)
            .map_err(|e| anyhow::anyhow!("Failed to build map from {}: {}", path.display(), e))?;
        tracing::debug!(
            target: "tilemap::content",
            path = %path.display(),
            records = count,
            "loaded tile records"
        );
        Ok(map)
    }
}

/// Writer for tile record arrays.
pub struct TileWriter;

impl TileWriter {
    /// Serialize the map's tiles as a pretty-printed record array.
    pub fn to_string<T>(map: &Tilemap<T>, format: RecordFormat) -> LoadResult<String>
    where
        T: Serialize,
    {
        let records = map.to_records();
        let content = match format {
            RecordFormat::Json => serde_json::to_string_pretty(&records)?,
            RecordFormat::Ron => {
                ron::ser::to_string_pretty(&records, ron::ser::PrettyConfig::default())?
            }
        };
        Ok(content)
    }

    /// Write the map's tiles to `path`, format chosen by extension.
    pub fn write<T>(map: &Tilemap<T>, path: &Path) -> LoadResult<()>
    where
        T: Serialize,
    {
        let content = Self::to_string(map, RecordFormat::from_path(path)?)?;
        std::fs::write(path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write file {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tilemap_core::TilePos;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Marker {
        id: String,
        x: i32,
        y: i32,
        #[serde(default)]
        label: String,
    }

    impl CellData for Marker {
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

    fn sample_map() -> Tilemap<Marker> {
        let mut map = Tilemap::<Marker>::default();
        map.create_map(3, 2).unwrap();
        map.modify_tile(2, 1, |m| m.label = "exit".into());
        map.remove_tile(0, 1);
        map
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            RecordFormat::from_path(Path::new("a/b.json")).unwrap(),
            RecordFormat::Json
        );
        assert_eq!(
            RecordFormat::from_path(Path::new("b.ron")).unwrap(),
            RecordFormat::Ron
        );
        assert!(RecordFormat::from_path(Path::new("b.yaml")).is_err());
        assert!(RecordFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn written_files_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let original = sample_map();

        for name in ["tiles.json", "tiles.ron"] {
            let path = dir.path().join(name);
            TileWriter::write(&original, &path).unwrap();

            let restored: Tilemap<Marker> = TileLoader::load(&path, 3, 2).unwrap();
            for (x, y, tile) in original.entries() {
                assert_eq!(restored.get_tile(x, y), Some(tile), "{name}");
            }
            assert_eq!(restored.get_tile(2, 1).unwrap().label, "exit");
        }
    }

    #[test]
    fn unbounded_load_keeps_records_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiles.json");
        TileWriter::write(&sample_map(), &path).unwrap();

        let restored: Tilemap<Marker> = TileLoader::load(&path, 0, 0).unwrap();
        assert!(!restored.is_bounded());
        assert_eq!(restored.count(), 5);
        assert!(!restored.has_tile(0, 1));
    }

    #[test]
    fn out_of_bounds_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiles.json");
        std::fs::write(&path, r#"[{ "id": "9,9", "x": 9, "y": 9 }]"#).unwrap();

        let err = TileLoader::load::<Marker>(&path, 3, 2).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "[ (id: ").unwrap();

        let err = TileLoader::load_records::<Marker>(&path).unwrap_err();
        assert!(err.to_string().contains("broken.ron"));
    }
}
