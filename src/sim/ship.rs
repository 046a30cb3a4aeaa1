//! The player's ship
//!
//! Owns movement (turn, thrust, friction), the shot cooldown, the
//! invulnerability window, the shield charge state machine and the 180° flip.
//! Destruction is idempotent and yields the three hull edges as debris once.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{Bullet, BulletOrigin, ShipDebris};
use super::physics::{Arena, Body, integrate, wrap_position};
use crate::consts::*;
use crate::{angle_delta, heading_vector, normalize_degrees, rotate_point};

/// Below this the shield is considered empty
const SHIELD_EPSILON: f32 = 1e-4;

/// An in-progress 180° turn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flip {
    /// Heading to land on (degrees, [0, 360))
    pub target: f32,
    /// +1 clockwise, -1 counter-clockwise
    pub direction: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    vel: Vec2,
    /// Degrees, 0 = up, clockwise positive
    pub heading: f32,
    pub radius: f32,
    last_shot_ms: Option<u64>,
    invulnerable_until_ms: u64,
    destroyed: bool,
    shield_charge: f32,
    shields_active: bool,
    flip: Option<Flip>,
    thrusting: bool,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            heading: 0.0,
            radius: SHIP_RADIUS,
            last_shot_ms: None,
            invulnerable_until_ms: 0,
            destroyed: false,
            shield_charge: 1.0,
            shields_active: false,
            flip: None,
            thrusting: false,
        }
    }

    // === Movement ===

    pub fn turn_left(&mut self) {
        if self.flip.is_none() {
            self.heading = normalize_degrees(self.heading - SHIP_TURN_RATE);
        }
    }

    pub fn turn_right(&mut self) {
        if self.flip.is_none() {
            self.heading = normalize_degrees(self.heading + SHIP_TURN_RATE);
        }
    }

    /// Accelerate along the heading, clamping speed by rescaling the vector
    pub fn thrust(&mut self) {
        self.vel += heading_vector(self.heading) * SHIP_THRUST;
        let speed = self.vel.length();
        if speed > SHIP_MAX_SPEED {
            self.vel = self.vel / speed * SHIP_MAX_SPEED;
        }
        self.thrusting = true;
    }

    /// Whether thrust was applied since the last [`Ship::update`]
    pub fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    /// Advance one frame: integrate, tick the shield, progress the flip
    pub fn update(&mut self, arena: &Arena) {
        (self.pos, self.vel) = integrate(self.pos, self.vel, SHIP_FRICTION, arena, true);
        self.update_shield();
        self.update_flip();
        self.thrusting = false;
    }

    // === Flip maneuver ===

    /// Begin a 180° turn the short way round. Ignored while one is running.
    pub fn start_flip(&mut self) {
        if self.flip.is_some() || self.destroyed {
            return;
        }
        let target = normalize_degrees(self.heading + 180.0);
        // angle_delta yields -180 for an exact half turn, so ties go counter-clockwise
        let direction = if angle_delta(self.heading, target) >= 0.0 { 1.0 } else { -1.0 };
        self.flip = Some(Flip { target, direction });
    }

    pub fn flip(&self) -> Option<Flip> {
        self.flip
    }

    fn update_flip(&mut self) {
        let Some(flip) = self.flip else { return };
        let remaining = angle_delta(self.heading, flip.target).abs();
        if remaining <= FLIP_RATE {
            self.heading = flip.target;
            self.flip = None;
        } else {
            self.heading = normalize_degrees(self.heading + flip.direction * FLIP_RATE);
        }
    }

    // === Shields ===

    /// Engage shields. Refused when empty or destroyed.
    pub fn activate_shields(&mut self) -> bool {
        if self.destroyed || self.shield_charge <= 0.0 {
            return false;
        }
        self.shields_active = true;
        true
    }

    /// Drop shields. Always honored.
    pub fn deactivate_shields(&mut self) {
        self.shields_active = false;
    }

    pub fn shields_active(&self) -> bool {
        self.shields_active
    }

    pub fn shield_charge(&self) -> f32 {
        self.shield_charge
    }

    fn update_shield(&mut self) {
        if self.shields_active {
            self.shield_charge = (self.shield_charge - SHIELD_DRAIN_PER_FRAME).max(0.0);
            if self.shield_charge <= SHIELD_EPSILON {
                self.shield_charge = 0.0;
                self.shields_active = false;
            }
        } else {
            self.shield_charge = (self.shield_charge + SHIELD_RECHARGE_PER_FRAME).min(1.0);
        }
    }

    /// Radius used for collision tests this frame
    pub fn effective_radius(&self) -> f32 {
        if self.shields_active { SHIELD_RADIUS } else { self.radius }
    }

    // === Weapons ===

    pub fn can_shoot(&self, now_ms: u64) -> bool {
        if self.destroyed {
            return false;
        }
        match self.last_shot_ms {
            Some(last) => now_ms.saturating_sub(last) > SHOT_COOLDOWN_MS,
            None => true,
        }
    }

    /// Fire from the nose if the cooldown allows
    pub fn shoot(&mut self, now_ms: u64) -> Option<Bullet> {
        if !self.can_shoot(now_ms) {
            return None;
        }
        self.last_shot_ms = Some(now_ms);
        let nose = self.pos + heading_vector(self.heading) * self.radius;
        Some(Bullet::new(nose, self.heading, BulletOrigin::Player))
    }

    // === Life cycle ===

    pub fn is_invulnerable(&self, now_ms: u64) -> bool {
        now_ms < self.invulnerable_until_ms
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Put the ship back at `pos`, at rest, facing up, invulnerable for a while
    pub fn respawn(&mut self, pos: Vec2, now_ms: u64) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.heading = 0.0;
        self.flip = None;
        self.thrusting = false;
        self.shields_active = false;
        self.invulnerable_until_ms = now_ms + INVULNERABILITY_MS;
        self.destroyed = false;
    }

    /// Triangle vertices in world-aligned local space (tip, left, right)
    pub fn outline(&self) -> [Vec2; 3] {
        let r = self.radius;
        [
            Vec2::new(0.0, -r),
            Vec2::new(-r / 2.0, r / 2.0),
            Vec2::new(r / 2.0, r / 2.0),
        ]
        .map(|v| rotate_point(v, self.heading))
    }

    /// Destroy the ship. The first call yields one debris piece per hull
    /// edge; later calls until the next respawn yield nothing.
    pub fn destroy<R: Rng>(&mut self, arena: &Arena, rng: &mut R) -> Option<[ShipDebris; 3]> {
        if self.destroyed {
            return None;
        }
        self.destroyed = true;
        self.shields_active = false;
        self.flip = None;
        self.thrusting = false;

        let hull = self.outline();
        let edge = |a: Vec2, b: Vec2, rng: &mut R| {
            let mid = (a + b) / 2.0;
            ShipDebris::new(wrap_position(self.pos + mid, arena), [a - mid, b - mid], self.vel, rng)
        };
        Some([
            edge(hull[0], hull[1], rng),
            edge(hull[1], hull[2], rng),
            edge(hull[2], hull[0], rng),
        ])
    }
}

impl Body for Ship {
    fn position(&self) -> Vec2 {
        self.pos
    }
    fn velocity(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.effective_radius()
    }
    fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse;
    }
}
