//! Tile categories and the tile records stored in the map

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::MapError;

/// The closed set of tile categories the world knows about.
///
/// The serde tags match the asset directory names used by existing map
/// files, so the enum round-trips against maps saved by older builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Stone,
    Decor,
    LargeDecor,
    /// Entity spawn markers placed in the editor and extracted at level start
    #[serde(rename = "spawners")]
    Spawner,
}

impl TileKind {
    /// The file/asset tag for this kind
    pub fn tag(&self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Stone => "stone",
            TileKind::Decor => "decor",
            TileKind::LargeDecor => "large_decor",
            TileKind::Spawner => "spawners",
        }
    }

    /// Parse an untrusted tag (editor input, loaded files)
    pub fn from_tag(tag: &str) -> Result<TileKind, MapError> {
        match tag {
            "grass" => Ok(TileKind::Grass),
            "stone" => Ok(TileKind::Stone),
            "decor" => Ok(TileKind::Decor),
            "large_decor" => Ok(TileKind::LargeDecor),
            "spawners" => Ok(TileKind::Spawner),
            other => Err(MapError::InvalidTile(other.to_string())),
        }
    }

    /// Whether tiles of this kind are solid for collision purposes
    pub fn is_solid(&self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    /// Whether tiles of this kind take part in autotile variant rewriting
    pub fn is_autotile(&self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    /// Returns all kinds for editor palette enumeration
    pub fn all() -> &'static [TileKind] {
        &[
            TileKind::Grass,
            TileKind::Stone,
            TileKind::Decor,
            TileKind::LargeDecor,
            TileKind::Spawner,
        ]
    }
}

/// Integer cell coordinate used as the grid key.
///
/// Structural key with a proper `Hash`, so negative coordinates and
/// formatting quirks cannot collide the way stringified keys could.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    /// Create a cell position
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell containing a continuous world-pixel position (floor division)
    pub fn from_world(pos: Vec2, tile_size: u32) -> Self {
        let ts = tile_size as f32;
        Self {
            x: (pos.x / ts).floor() as i32,
            y: (pos.y / ts).floor() as i32,
        }
    }

    /// The world-pixel origin of this cell
    pub fn to_world(self, tile_size: u32) -> Vec2 {
        Vec2::new(
            (self.x * tile_size as i32) as f32,
            (self.y * tile_size as i32) as f32,
        )
    }

    /// This cell shifted by a cell-unit offset
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A grid-resident tile. Its position is the cell key it is stored under,
/// so the record itself carries only the visual identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(rename = "type")]
    pub kind: TileKind,
    /// Index into the kind's variant image list
    pub variant: u8,
}

impl Tile {
    /// Create a tile
    pub const fn new(kind: TileKind, variant: u8) -> Self {
        Self { kind, variant }
    }
}

/// A freely positioned decoration, stored outside the grid in continuous
/// world-pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffgridTile {
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub variant: u8,
    /// World-pixel position (not cell-aligned)
    pub pos: Vec2,
}

impl OffgridTile {
    /// Create an off-grid tile at a world-pixel position
    pub const fn new(kind: TileKind, variant: u8, pos: Vec2) -> Self {
        Self { kind, variant, pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for kind in TileKind::all() {
            assert_eq!(TileKind::from_tag(kind.tag()).unwrap(), *kind);
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = TileKind::from_tag("lava").unwrap_err();
        assert!(matches!(err, MapError::InvalidTile(tag) if tag == "lava"));
    }

    #[test]
    fn test_solid_subset() {
        assert!(TileKind::Grass.is_solid());
        assert!(TileKind::Stone.is_solid());
        assert!(!TileKind::Decor.is_solid());
        assert!(!TileKind::LargeDecor.is_solid());
        assert!(!TileKind::Spawner.is_solid());
    }

    #[test]
    fn test_cell_from_world_floors_negatives() {
        assert_eq!(CellPos::from_world(Vec2::new(17.0, 31.9), 16), CellPos::new(1, 1));
        assert_eq!(CellPos::from_world(Vec2::new(-0.5, -16.0), 16), CellPos::new(-1, -1));
    }

    #[test]
    fn test_cell_to_world() {
        assert_eq!(CellPos::new(2, -3).to_world(16), Vec2::new(32.0, -48.0));
    }
}
