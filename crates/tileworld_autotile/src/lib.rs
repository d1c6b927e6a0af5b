//! Neighbor-pattern autotiling
//!
//! Derives a tile's visual variant from which of its four cardinal neighbors
//! share its kind. The pass is a batch operation invoked explicitly (editor
//! hotkey, map export), never maintained live by `set`/`remove`: it only
//! reads kinds and rewrites variants, so re-running it is a no-op.

use std::collections::HashMap;

use tracing::debug;

use tileworld_core::TileMap;

/// A cardinal neighbor direction, in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    North,
    South,
    East,
    West,
}

impl Cardinal {
    /// All four directions, for neighbor scans
    pub const ALL: [Cardinal; 4] = [
        Cardinal::North,
        Cardinal::South,
        Cardinal::East,
        Cardinal::West,
    ];

    /// Cell-unit offset of the neighbor in this direction
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Cardinal::North => (0, -1),
            Cardinal::South => (0, 1),
            Cardinal::East => (1, 0),
            Cardinal::West => (-1, 0),
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Cardinal::North => 1 << 0,
            Cardinal::South => 1 << 1,
            Cardinal::East => 1 << 2,
            Cardinal::West => 1 << 3,
        }
    }
}

/// A set of cardinal directions, canonical by construction.
///
/// Replaces the sorted-offset-tuple keys older map tooling used: two scans
/// that find the same neighbors always build bit-identical sets, whatever
/// order they probed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NeighborSet(u8);

impl NeighborSet {
    /// The empty set (an isolated tile)
    pub const EMPTY: NeighborSet = NeighborSet(0);

    /// This set with `dir` added
    #[must_use]
    pub const fn with(self, dir: Cardinal) -> NeighborSet {
        NeighborSet(self.0 | dir.bit())
    }

    /// Whether `dir` is in the set
    pub const fn contains(self, dir: Cardinal) -> bool {
        self.0 & dir.bit() != 0
    }

    /// Number of directions in the set
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether the set is empty
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Cardinal> for NeighborSet {
    fn from_iter<I: IntoIterator<Item = Cardinal>>(iter: I) -> Self {
        iter.into_iter().fold(NeighborSet::EMPTY, NeighborSet::with)
    }
}

/// Mapping from a same-kind-neighbor pattern to the variant it selects.
///
/// The default table is deliberately inexhaustive: patterns without an entry
/// (an isolated tile, a tile with only one neighbor, ...) keep whatever
/// variant they already have.
#[derive(Debug, Clone)]
pub struct AutotileRules {
    variants: HashMap<NeighborSet, u8>,
}

impl Default for AutotileRules {
    /// The standard 9-entry table for 3x3 terrain tilesets: variants 0..=7
    /// walk the border clockwise from the top-left corner, variant 8 is the
    /// interior tile.
    fn default() -> Self {
        use Cardinal::{East, North, South, West};
        let entry = |dirs: &[Cardinal]| dirs.iter().copied().collect::<NeighborSet>();
        let mut rules = AutotileRules::empty();
        rules.insert(entry(&[East, South]), 0);
        rules.insert(entry(&[East, South, West]), 1);
        rules.insert(entry(&[West, South]), 2);
        rules.insert(entry(&[West, North, South]), 3);
        rules.insert(entry(&[West, North]), 4);
        rules.insert(entry(&[West, North, East]), 5);
        rules.insert(entry(&[East, North]), 6);
        rules.insert(entry(&[East, North, South]), 7);
        rules.insert(entry(&[East, North, South, West]), 8);
        rules
    }
}

impl AutotileRules {
    /// A table with no entries
    pub fn empty() -> Self {
        Self {
            variants: HashMap::new(),
        }
    }

    /// Add or replace the variant for a neighbor pattern
    pub fn insert(&mut self, pattern: NeighborSet, variant: u8) {
        self.variants.insert(pattern, variant);
    }

    /// The variant a neighbor pattern maps to, if the table has an entry
    pub fn variant_for(&self, pattern: NeighborSet) -> Option<u8> {
        self.variants.get(&pattern).copied()
    }

    /// Rewrite the variant of every auto-tileable grid tile from its
    /// same-kind cardinal neighbors. Diagonals and off-grid tiles are
    /// ignored. Returns the number of tiles whose variant changed.
    pub fn apply(&self, map: &mut TileMap) -> usize {
        let mut rewrites = Vec::new();
        for (pos, tile) in map.cells() {
            if !tile.kind.is_autotile() {
                continue;
            }
            let pattern: NeighborSet = Cardinal::ALL
                .into_iter()
                .filter(|dir| {
                    let (dx, dy) = dir.offset();
                    map.get(pos.offset(dx, dy))
                        .is_some_and(|n| n.kind == tile.kind)
                })
                .collect();
            if let Some(variant) = self.variant_for(pattern) {
                if variant != tile.variant {
                    rewrites.push((pos, variant));
                }
            }
        }
        for &(pos, variant) in &rewrites {
            if let Some(tile) = map.get_mut(pos) {
                tile.variant = variant;
            }
        }
        debug!(rewritten = rewrites.len(), "autotile pass complete");
        rewrites.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_core::{CellPos, Tile, TileKind};

    fn block_3x3(kind: TileKind) -> TileMap {
        let mut map = TileMap::new(16);
        for x in 0..3 {
            for y in 0..3 {
                map.set(CellPos::new(x, y), Tile::new(kind, 99));
            }
        }
        map
    }

    fn variant_at(map: &TileMap, x: i32, y: i32) -> u8 {
        map.get(CellPos::new(x, y)).unwrap().variant
    }

    #[test]
    fn test_3x3_block_gets_border_and_interior_variants() {
        let mut map = block_3x3(TileKind::Grass);
        AutotileRules::default().apply(&mut map);

        // Corners
        assert_eq!(variant_at(&map, 0, 0), 0); // E+S
        assert_eq!(variant_at(&map, 2, 0), 2); // W+S
        assert_eq!(variant_at(&map, 2, 2), 4); // W+N
        assert_eq!(variant_at(&map, 0, 2), 6); // E+N
        // Edges
        assert_eq!(variant_at(&map, 1, 0), 1); // E+S+W
        assert_eq!(variant_at(&map, 2, 1), 3); // W+N+S
        assert_eq!(variant_at(&map, 1, 2), 5); // W+N+E
        assert_eq!(variant_at(&map, 0, 1), 7); // E+N+S
        // Interior
        assert_eq!(variant_at(&map, 1, 1), 8);
    }

    #[test]
    fn test_idempotent() {
        let mut map = block_3x3(TileKind::Stone);
        let rules = AutotileRules::default();
        rules.apply(&mut map);
        let after_first = map.clone();

        let rewritten = rules.apply(&mut map);
        assert_eq!(rewritten, 0);
        for (pos, tile) in after_first.cells() {
            assert_eq!(map.get(pos), Some(tile));
        }
    }

    #[test]
    fn test_unmatched_pattern_keeps_variant() {
        let mut map = TileMap::new(16);
        // Isolated tile: empty pattern has no table entry
        map.set(CellPos::new(5, 5), Tile::new(TileKind::Grass, 7));
        // A single-neighbor pair: {E} and {W} have no entries either
        map.set(CellPos::new(10, 0), Tile::new(TileKind::Grass, 3));
        map.set(CellPos::new(11, 0), Tile::new(TileKind::Grass, 4));

        AutotileRules::default().apply(&mut map);
        assert_eq!(variant_at(&map, 5, 5), 7);
        assert_eq!(variant_at(&map, 10, 0), 3);
        assert_eq!(variant_at(&map, 11, 0), 4);
    }

    #[test]
    fn test_only_same_kind_neighbors_count() {
        let mut map = TileMap::new(16);
        map.set(CellPos::new(0, 0), Tile::new(TileKind::Grass, 9));
        map.set(CellPos::new(1, 0), Tile::new(TileKind::Stone, 9));
        map.set(CellPos::new(0, 1), Tile::new(TileKind::Grass, 9));

        AutotileRules::default().apply(&mut map);
        // Grass at (0,0) only sees the grass below it: pattern {S}, no entry
        assert_eq!(variant_at(&map, 0, 0), 9);
    }

    #[test]
    fn test_decorative_kinds_are_skipped() {
        let mut map = TileMap::new(16);
        for x in 0..3 {
            for y in 0..3 {
                map.set(CellPos::new(x, y), Tile::new(TileKind::Decor, 1));
            }
        }
        let rewritten = AutotileRules::default().apply(&mut map);
        assert_eq!(rewritten, 0);
        assert_eq!(variant_at(&map, 1, 1), 1);
    }

    #[test]
    fn test_neighbor_set_is_order_independent() {
        use Cardinal::{East, North, South, West};
        let a: NeighborSet = [North, East, South, West].into_iter().collect();
        let b: NeighborSet = [West, South, East, North].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        assert!(a.contains(South));
        assert!(!NeighborSet::EMPTY.contains(South));
    }
}
