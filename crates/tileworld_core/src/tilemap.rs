//! The tile map: grid-cell spatial index plus off-grid decorations

use std::collections::HashMap;

use glam::{IVec2, UVec2, Vec2};

use crate::{CellPos, MapError, OffgridTile, Tile, TileKind};

/// Default cell edge length in pixels
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Cell offsets of the 3x3 block around a cell, in the fixed enumeration
/// order shared by autotiling and collision queries. Reordering this array
/// changes the physics tie-break behavior, so it is part of the contract.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Tile-grid world state: one tile per cell, plus freely positioned
/// off-grid decorations kept in insertion order.
///
/// The map is single-writer by design: the editor's mutation commands and
/// the game's physics step never run concurrently, and queries hand out
/// either copies or borrows scoped to the call.
#[derive(Debug, Clone)]
pub struct TileMap {
    tile_size: u32,
    tiles: HashMap<CellPos, Tile>,
    offgrid: Vec<OffgridTile>,
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl TileMap {
    /// Create an empty map with the given cell size in pixels
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size,
            tiles: HashMap::new(),
            offgrid: Vec::new(),
        }
    }

    /// Cell edge length in pixels
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of grid-resident tiles
    pub fn grid_len(&self) -> usize {
        self.tiles.len()
    }

    /// Place or overwrite the tile at a cell
    pub fn set(&mut self, pos: CellPos, tile: Tile) {
        self.tiles.insert(pos, tile);
    }

    /// Place a tile from untrusted editor input. The tag is validated
    /// before any state is mutated.
    pub fn insert_tag(&mut self, pos: CellPos, tag: &str, variant: u8) -> Result<(), MapError> {
        let kind = TileKind::from_tag(tag)?;
        self.tiles.insert(pos, Tile::new(kind, variant));
        Ok(())
    }

    /// Remove the tile at a cell. Removing an empty cell is a no-op.
    pub fn remove(&mut self, pos: CellPos) -> Option<Tile> {
        self.tiles.remove(&pos)
    }

    /// Get the tile at a cell
    pub fn get(&self, pos: CellPos) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    /// Get the tile at a cell, mutably
    pub fn get_mut(&mut self, pos: CellPos) -> Option<&mut Tile> {
        self.tiles.get_mut(&pos)
    }

    /// Iterate all grid-resident tiles (arbitrary order)
    pub fn cells(&self) -> impl Iterator<Item = (CellPos, &Tile)> + '_ {
        self.tiles.iter().map(|(pos, tile)| (*pos, tile))
    }

    /// The grid tiles in the 3x3 block of cells centered on the cell
    /// containing a world-pixel position, in [`NEIGHBOR_OFFSETS`] order.
    pub fn tiles_around(&self, pos: Vec2) -> Vec<(CellPos, &Tile)> {
        let center = CellPos::from_world(pos, self.tile_size);
        let mut tiles = Vec::new();
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let cell = center.offset(dx, dy);
            if let Some(tile) = self.tiles.get(&cell) {
                tiles.push((cell, tile));
            }
        }
        tiles
    }

    /// The solid tile whose cell contains a world-pixel position, if any.
    /// Used for point probes like ground/wall checks.
    pub fn solid_at(&self, pos: Vec2) -> Option<&Tile> {
        let tile = self.tiles.get(&CellPos::from_world(pos, self.tile_size))?;
        tile.kind.is_solid().then_some(tile)
    }

    /// Append an off-grid decoration
    pub fn add_offgrid(&mut self, tile: OffgridTile) {
        self.offgrid.push(tile);
    }

    /// Remove the first off-grid tile equal to `tile`. Returns whether one
    /// was removed.
    pub fn remove_offgrid(&mut self, tile: &OffgridTile) -> bool {
        match self.offgrid.iter().position(|t| t == tile) {
            Some(idx) => {
                self.offgrid.remove(idx);
                true
            }
            None => false,
        }
    }

    /// The off-grid decorations in insertion order. Editors that delete
    /// while iterating should clone this slice and iterate the snapshot.
    pub fn offgrid(&self) -> &[OffgridTile] {
        &self.offgrid
    }

    /// Pull out every tile (grid and off-grid) matching one of the
    /// kind+variant pairs. Grid hits are returned with their position
    /// converted to world-pixel units; the stored originals stay in cell
    /// units. With `keep == false` the matches are removed from the map.
    pub fn extract(&mut self, ids: &[(TileKind, u8)], keep: bool) -> Vec<OffgridTile> {
        let mut matches: Vec<OffgridTile> = if keep {
            self.offgrid
                .iter()
                .filter(|t| ids.contains(&(t.kind, t.variant)))
                .copied()
                .collect()
        } else {
            let (taken, rest) = std::mem::take(&mut self.offgrid)
                .into_iter()
                .partition(|t| ids.contains(&(t.kind, t.variant)));
            self.offgrid = rest;
            taken
        };

        // Snapshot the matching cells first so removal never aliases the scan
        let cells: Vec<CellPos> = self
            .tiles
            .iter()
            .filter(|(_, t)| ids.contains(&(t.kind, t.variant)))
            .map(|(pos, _)| *pos)
            .collect();
        for cell in cells {
            let tile = if keep {
                self.tiles[&cell]
            } else {
                match self.tiles.remove(&cell) {
                    Some(tile) => tile,
                    None => continue,
                }
            };
            matches.push(OffgridTile::new(
                tile.kind,
                tile.variant,
                cell.to_world(self.tile_size),
            ));
        }

        matches
    }

    /// Read-only render query: all off-grid tiles (first, in paint order)
    /// followed by the grid tiles whose cells intersect the pixel window at
    /// `offset` with the given surface size. Positions are world-pixel
    /// origins; the renderer subtracts `offset` itself.
    pub fn tiles_in_window(&self, offset: IVec2, size: UVec2) -> Vec<(Vec2, Tile)> {
        let mut visible: Vec<(Vec2, Tile)> = self
            .offgrid
            .iter()
            .map(|t| (t.pos, Tile::new(t.kind, t.variant)))
            .collect();

        let ts = self.tile_size as i32;
        let x0 = offset.x.div_euclid(ts);
        let x1 = (offset.x + size.x as i32).div_euclid(ts);
        let y0 = offset.y.div_euclid(ts);
        let y1 = (offset.y + size.y as i32).div_euclid(ts);
        for x in x0..=x1 {
            for y in y0..=y1 {
                let cell = CellPos::new(x, y);
                if let Some(tile) = self.tiles.get(&cell) {
                    visible.push((cell.to_world(self.tile_size), *tile));
                }
            }
        }
        visible
    }

    pub(crate) fn replace_contents(
        &mut self,
        tile_size: u32,
        tiles: HashMap<CellPos, Tile>,
        offgrid: Vec<OffgridTile>,
    ) {
        self.tile_size = tile_size;
        self.tiles = tiles;
        self.offgrid = offgrid;
    }

    pub(crate) fn grid(&self) -> &HashMap<CellPos, Tile> {
        &self.tiles
    }
}
