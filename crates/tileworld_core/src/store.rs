//! Map file save/load
//!
//! The on-disk format is JSON with the exact field names and `"x;y"` grid
//! keys used by previously saved maps, so old files keep loading:
//!
//! ```json
//! {
//!   "tilemap": { "2;3": { "type": "stone", "variant": 0, "pos": [2, 3] } },
//!   "tile_size": 16,
//!   "offgrid": [ { "type": "decor", "variant": 1, "pos": [40.5, 12.0] } ]
//! }
//! ```
//!
//! The string key is authoritative for a grid tile's position; the `pos`
//! field is redundant and only written for compatibility.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{CellPos, MapError, OffgridTile, Tile, TileKind, TileMap};

/// One grid tile as stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct GridRecord {
    #[serde(rename = "type")]
    tag: String,
    variant: u8,
    /// Cell-unit position, mirrored from the key
    pos: [i32; 2],
}

/// One off-grid tile as stored on disk (`pos` in pixel units)
#[derive(Debug, Serialize, Deserialize)]
struct OffgridRecord {
    #[serde(rename = "type")]
    tag: String,
    variant: u8,
    pos: [f32; 2],
}

/// The whole map file
#[derive(Debug, Serialize, Deserialize)]
struct MapFile {
    tilemap: HashMap<String, GridRecord>,
    tile_size: u32,
    #[serde(default)]
    offgrid: Vec<OffgridRecord>,
}

fn cell_key(pos: CellPos) -> String {
    format!("{};{}", pos.x, pos.y)
}

fn parse_cell_key(key: &str) -> Result<CellPos, MapError> {
    let (x, y) = key
        .split_once(';')
        .ok_or_else(|| MapError::CorruptData(format!("malformed cell key `{key}`")))?;
    let parse = |s: &str| {
        s.parse::<i32>()
            .map_err(|_| MapError::CorruptData(format!("non-integer cell key `{key}`")))
    };
    Ok(CellPos::new(parse(x)?, parse(y)?))
}

impl TileMap {
    /// Save the map to `path` as JSON. Filesystem failures surface as
    /// [`MapError::Io`]; there is no retry.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Io`] if the target cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MapError> {
        let file = MapFile {
            tilemap: self
                .grid()
                .iter()
                .map(|(pos, tile)| {
                    let record = GridRecord {
                        tag: tile.kind.tag().to_string(),
                        variant: tile.variant,
                        pos: [pos.x, pos.y],
                    };
                    (cell_key(*pos), record)
                })
                .collect(),
            tile_size: self.tile_size(),
            offgrid: self
                .offgrid()
                .iter()
                .map(|t| OffgridRecord {
                    tag: t.kind.tag().to_string(),
                    variant: t.variant,
                    pos: [t.pos.x, t.pos.y],
                })
                .collect(),
        };
        let content = serde_json::to_string(&file)
            .map_err(|e| MapError::CorruptData(e.to_string()))?;
        std::fs::write(path, content)?;
        info!(
            grid = self.grid_len(),
            offgrid = self.offgrid().len(),
            "saved map to {}",
            path.display()
        );
        Ok(())
    }

    /// Load a map from `path`, replacing this map's contents. The index is
    /// only touched after the whole file parsed and validated, so a corrupt
    /// file never leaves a partially populated map behind.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::NotFound`] if the file does not exist (callers
    /// typically fall back to an empty map), [`MapError::CorruptData`] if
    /// the JSON, a cell key, or a tile tag does not match the schema, and
    /// [`MapError::Io`] for other filesystem failures.
    pub fn load(&mut self, path: &Path) -> Result<(), MapError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MapError::NotFound(path.to_path_buf())
            } else {
                MapError::Io(e)
            }
        })?;
        let file: MapFile =
            serde_json::from_str(&content).map_err(|e| MapError::CorruptData(e.to_string()))?;

        let mut tiles = HashMap::with_capacity(file.tilemap.len());
        for (key, record) in &file.tilemap {
            let pos = parse_cell_key(key)?;
            let kind = TileKind::from_tag(&record.tag)
                .map_err(|_| MapError::CorruptData(format!("unknown tile type `{}`", record.tag)))?;
            tiles.insert(pos, Tile::new(kind, record.variant));
        }
        let mut offgrid = Vec::with_capacity(file.offgrid.len());
        for record in &file.offgrid {
            let kind = TileKind::from_tag(&record.tag)
                .map_err(|_| MapError::CorruptData(format!("unknown tile type `{}`", record.tag)))?;
            offgrid.push(OffgridTile::new(
                kind,
                record.variant,
                glam::Vec2::new(record.pos[0], record.pos[1]),
            ));
        }

        info!(
            grid = tiles.len(),
            offgrid = offgrid.len(),
            "loaded map from {}",
            path.display()
        );
        self.replace_contents(file.tile_size, tiles, offgrid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");

        let mut map = TileMap::new(16);
        map.set(CellPos::new(2, 3), Tile::new(TileKind::Stone, 0));
        map.add_offgrid(OffgridTile::new(TileKind::Decor, 1, Vec2::new(40.5, 12.0)));
        map.save(&path).unwrap();

        let mut loaded = TileMap::default();
        loaded.load(&path).unwrap();
        assert_eq!(loaded.tile_size(), 16);
        assert_eq!(loaded.get(CellPos::new(2, 3)), Some(&Tile::new(TileKind::Stone, 0)));
        assert_eq!(
            loaded.offgrid(),
            &[OffgridTile::new(TileKind::Decor, 1, Vec2::new(40.5, 12.0))]
        );
    }

    #[test]
    fn test_file_uses_legacy_key_and_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");

        let mut map = TileMap::new(16);
        map.set(CellPos::new(-4, 7), Tile::new(TileKind::Grass, 3));
        map.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let record = &raw["tilemap"]["-4;7"];
        assert_eq!(record["type"], "grass");
        assert_eq!(record["variant"], 3);
        assert_eq!(record["pos"][0], -4);
        assert_eq!(raw["tile_size"], 16);
    }

    #[test]
    fn test_loads_hand_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        std::fs::write(
            &path,
            r#"{
                "tilemap": {
                    "0;0": {"type": "grass", "variant": 1, "pos": [0, 0]},
                    "1;0": {"type": "spawners", "variant": 0, "pos": [1, 0]}
                },
                "tile_size": 16,
                "offgrid": [{"type": "large_decor", "variant": 2, "pos": [12.5, 3.0]}]
            }"#,
        )
        .unwrap();

        let mut map = TileMap::default();
        map.load(&path).unwrap();
        assert_eq!(map.get(CellPos::new(0, 0)), Some(&Tile::new(TileKind::Grass, 1)));
        assert_eq!(map.get(CellPos::new(1, 0)), Some(&Tile::new(TileKind::Spawner, 0)));
        assert_eq!(map.offgrid().len(), 1);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut map = TileMap::default();
        let err = map.load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, MapError::NotFound(_)));
    }

    #[test]
    fn test_malformed_json_is_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut map = TileMap::default();
        assert!(matches!(map.load(&path).unwrap_err(), MapError::CorruptData(_)));
    }

    #[test]
    fn test_malformed_cell_key_is_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        std::fs::write(
            &path,
            r#"{"tilemap": {"2,3": {"type": "grass", "variant": 0, "pos": [2, 3]}}, "tile_size": 16, "offgrid": []}"#,
        )
        .unwrap();

        let mut map = TileMap::default();
        assert!(matches!(map.load(&path).unwrap_err(), MapError::CorruptData(_)));
    }

    #[test]
    fn test_unknown_tile_tag_is_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        std::fs::write(
            &path,
            r#"{"tilemap": {"0;0": {"type": "lava", "variant": 0, "pos": [0, 0]}}, "tile_size": 16, "offgrid": []}"#,
        )
        .unwrap();

        let mut map = TileMap::default();
        assert!(matches!(map.load(&path).unwrap_err(), MapError::CorruptData(_)));
    }

    #[test]
    fn test_failed_load_leaves_map_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        std::fs::write(&path, r#"{"tilemap": {"bad": {}}, "tile_size": 16}"#).unwrap();

        let mut map = TileMap::new(16);
        map.set(CellPos::new(0, 0), Tile::new(TileKind::Grass, 0));
        assert!(map.load(&path).is_err());
        assert_eq!(map.get(CellPos::new(0, 0)), Some(&Tile::new(TileKind::Grass, 0)));
    }

    #[test]
    fn test_save_to_unwritable_target_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let map = TileMap::default();
        // A directory path is not a writable file target
        assert!(matches!(map.save(dir.path()).unwrap_err(), MapError::Io(_)));
    }
}
