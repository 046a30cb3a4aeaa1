//! Per-frame integration for every entity kind
//!
//! Euler step with an implicit timestep of one frame:
//! position += velocity, then optional friction, then toroidal wrap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{HEIGHT, WIDTH};

/// Immutable world configuration shared by every component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
        }
    }
}

impl Arena {
    /// Screen center
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when `pos` lies outside the field by more than `margin`
    pub fn is_far_outside(&self, pos: Vec2, margin: f32) -> bool {
        pos.x < -margin
            || pos.x > self.width + margin
            || pos.y < -margin
            || pos.y > self.height + margin
    }
}

/// Wrap a single coordinate into [0, dim)
#[inline]
pub fn wrap_coord(coord: f32, dim: f32) -> f32 {
    let c = coord.rem_euclid(dim);
    // A tiny negative input can round up to exactly `dim`
    if c >= dim { 0.0 } else { c }
}

/// Wrap a position onto the torus
#[inline]
pub fn wrap_position(pos: Vec2, arena: &Arena) -> Vec2 {
    Vec2::new(wrap_coord(pos.x, arena.width), wrap_coord(pos.y, arena.height))
}

/// One integration step. Returns the new (position, velocity).
///
/// `friction` of 1.0 means no damping. Wrapping is applied when `wrap` is set;
/// aliens fly in from outside the field and are the only unwrapped kind.
#[inline]
pub fn integrate(pos: Vec2, vel: Vec2, friction: f32, arena: &Arena, wrap: bool) -> (Vec2, Vec2) {
    let moved = pos + vel;
    let pos = if wrap { wrap_position(moved, arena) } else { moved };
    (pos, vel * friction)
}

/// A circular body that can take part in collisions and shield bounces
pub trait Body {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn radius(&self) -> f32;
    /// Add `impulse` to the current velocity
    fn apply_impulse(&mut self, impulse: Vec2);
}
