//! Game-loop consumers of the tileworld map
//!
//! - `solid_rects_around` / `Rect` - Solid geometry queries near a world position
//! - `PhysicsBody` - Axis-separated, frame-stepped movement resolution
//!
//! Everything here runs single-threaded between frames: the body borrows the
//! map read-only for one update and keeps nothing afterwards.

pub mod collision;
pub mod physics;

pub use collision::{solid_rects_around, Rect};
pub use physics::{CollisionTouch, PhysicsBody, GRAVITY, JUMP_VELOCITY, TERMINAL_VELOCITY};
