//! Solid geometry queries against the tile map

use glam::Vec2;

use tileworld_core::{CellPos, TileMap};

/// Axis-aligned rectangle in world-pixel units, origin at the top-left
/// (y grows downward, matching the tile grid).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Create a rect from its top-left origin and size
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// The full-cell rect of a grid cell
    pub fn from_cell(cell: CellPos, tile_size: u32) -> Self {
        let ts = tile_size as f32;
        Self {
            pos: cell.to_world(tile_size),
            size: Vec2::new(ts, ts),
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test: rects that merely share an edge do not overlap,
    /// so a body clamped flush against a tile is at rest, not colliding.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// The solid tiles in the 3x3 cell block around a world-pixel position, as
/// full-cell rects in the map's fixed neighbor enumeration order. Decorative
/// kinds never appear, so physics can consume the result unfiltered.
pub fn solid_rects_around(map: &TileMap, pos: Vec2) -> Vec<Rect> {
    map.tiles_around(pos)
        .into_iter()
        .filter(|(_, tile)| tile.kind.is_solid())
        .map(|(cell, _)| Rect::from_cell(cell, map.tile_size()))
        .collect()
}
