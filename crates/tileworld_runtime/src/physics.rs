//! Frame-stepped entity physics against the tile grid

use glam::Vec2;

use tileworld_core::TileMap;

use crate::collision::{solid_rects_around, Rect};

/// Downward acceleration added to vertical velocity every frame
pub const GRAVITY: f32 = 0.1;
/// Terminal fall speed; vertical velocity never accumulates past this
pub const TERMINAL_VELOCITY: f32 = 5.0;
/// Vertical velocity applied by [`PhysicsBody::jump`]
pub const JUMP_VELOCITY: f32 = -3.0;

/// Which sides of the body touched solid geometry this frame.
/// Reset at the start of every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionTouch {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// An entity's position/velocity state, resolved against the map once per
/// simulation frame. The body holds no reference into the map; it receives
/// a read-only borrow for the duration of [`update`](PhysicsBody::update).
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    /// Top-left corner in world-pixel units
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub collisions: CollisionTouch,
}

impl PhysicsBody {
    /// Create a body at rest
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            collisions: CollisionTouch::default(),
        }
    }

    /// The body's current bounding rect
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Start a jump
    pub fn jump(&mut self) {
        self.velocity.y = JUMP_VELOCITY;
    }

    /// Whether the body ended the last update standing on solid ground
    pub fn on_ground(&self) -> bool {
        self.collisions.down
    }

    /// Advance one simulation frame. `movement` is the externally supplied
    /// intent (e.g. -1/0/+1 per axis from input); the frame displacement is
    /// `movement + velocity`.
    ///
    /// Resolution is axis-separated, X before Y, so a corner approach
    /// resolves as a wall hit then a floor hit instead of tunneling.
    /// When several obstacles overlap on the same axis they are clamped in
    /// the map's neighbor enumeration order and the last one processed wins
    /// the position write. Over contiguous solid terrain every obstacle
    /// yields the same clamp; the tie-break order is part of the movement
    /// contract and must not be reordered.
    pub fn update(&mut self, map: &TileMap, movement: Vec2) {
        self.collisions = CollisionTouch::default();
        let frame = movement + self.velocity;

        self.pos.x += frame.x;
        let mut rect = self.rect();
        for tile_rect in solid_rects_around(map, self.pos) {
            if rect.overlaps(&tile_rect) {
                if frame.x > 0.0 {
                    rect.pos.x = tile_rect.left() - rect.size.x;
                    self.collisions.right = true;
                }
                if frame.x < 0.0 {
                    rect.pos.x = tile_rect.right();
                    self.collisions.left = true;
                }
                self.pos.x = rect.pos.x;
            }
        }

        self.pos.y += frame.y;
        let mut rect = self.rect();
        for tile_rect in solid_rects_around(map, self.pos) {
            if rect.overlaps(&tile_rect) {
                if frame.y > 0.0 {
                    rect.pos.y = tile_rect.top() - rect.size.y;
                    self.collisions.down = true;
                }
                if frame.y < 0.0 {
                    rect.pos.y = tile_rect.bottom();
                    self.collisions.up = true;
                }
                self.pos.y = rect.pos.y;
            }
        }

        self.velocity.y = (self.velocity.y + GRAVITY).min(TERMINAL_VELOCITY);
        if self.collisions.down || self.collisions.up {
            self.velocity.y = 0.0;
        }
    }
}
