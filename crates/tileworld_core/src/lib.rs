//! Core data structures for the tileworld map
//!
//! This crate provides the fundamental types for representing a tile-grid
//! world shared by the game runtime and the level editor:
//! - `TileMap` - The spatial index: one tile per grid cell plus off-grid decorations
//! - `Tile` / `OffgridTile` - Grid-resident and freely positioned tile records
//! - `TileKind` - The closed set of tile categories, with solid/autotile subsets
//! - `CellPos` - Structural integer cell key with world-space conversions
//! - `MapError` - Mutation and persistence errors
//!
//! Map persistence (JSON save/load with the legacy `"x;y"` key format) lives
//! in the `store` module and is exposed as `TileMap::save` / `TileMap::load`.

mod error;
mod store;
mod tile;
mod tilemap;

pub use error::MapError;
pub use tile::{CellPos, OffgridTile, Tile, TileKind};
pub use tilemap::{TileMap, DEFAULT_TILE_SIZE, NEIGHBOR_OFFSETS};
