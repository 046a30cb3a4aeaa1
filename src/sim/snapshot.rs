//! Read-only frame description handed to the presentation layer
//!
//! The simulation never draws. After each tick the host builds a
//! [`FrameSnapshot`] and passes it to whatever [`Presenter`] it owns.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::rotate_point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Shield,
    Asteroid,
    PlayerBullet,
    AlienBullet,
    Alien,
    Particle,
    Debris,
}

/// One drawable thing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Degrees, clockwise from up
    pub rotation: f32,
    pub radius: f32,
    /// 0 when fresh, 1 when about to expire (fade for particles/debris)
    pub age_ratio: f32,
    /// Vertices relative to `pos`, already rotated. Empty for round shapes.
    pub outline: Vec<Vec2>,
    /// Ship only: engine flame visible
    pub thrusting: bool,
}

impl EntityView {
    fn round(kind: EntityKind, pos: Vec2, radius: f32) -> Self {
        Self {
            kind,
            pos,
            rotation: 0.0,
            radius,
            age_ratio: 0.0,
            outline: Vec::new(),
            thrusting: false,
        }
    }
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    /// 0.0..=1.0
    pub shield_charge: f32,
    /// 0.0..=1.0 triangle wave while shields are up, for a pulsing ring
    pub shield_pulse: f32,
    pub shields_active: bool,
    pub phase: GamePhase,
    pub paused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub entities: Vec<EntityView>,
    pub hud: HudView,
}

impl FrameSnapshot {
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}

/// Presentation sink. Implementations must not feed anything back into the
/// simulation.
pub trait Presenter {
    fn present(&mut self, frame: &FrameSnapshot);
}

/// Blink phase for an invulnerable ship: hidden on even 100 ms slots
fn ship_blink_hidden(now_ms: u64) -> bool {
    (now_ms / 100) % 2 == 0
}

fn shield_pulse(now_ms: u64) -> f32 {
    let t = (now_ms % SHIELD_PULSE_MS) as f32 / SHIELD_PULSE_MS as f32;
    1.0 - (2.0 * t - 1.0).abs()
}

impl GameState {
    /// Describe the current frame for drawing
    pub fn snapshot(&self, now_ms: u64) -> FrameSnapshot {
        let mut entities = Vec::with_capacity(
            1 + self.asteroids.len()
                + self.bullets.len()
                + self.aliens.len()
                + self.particles.len()
                + self.debris.len(),
        );

        for asteroid in &self.asteroids {
            entities.push(EntityView {
                kind: EntityKind::Asteroid,
                pos: asteroid.pos,
                rotation: asteroid.rotation,
                radius: asteroid.radius,
                age_ratio: 0.0,
                outline: asteroid.outline.iter().map(|&v| rotate_point(v, asteroid.rotation)).collect(),
                thrusting: false,
            });
        }

        for alien in self.aliens.iter().filter(|a| !a.is_destroyed()) {
            entities.push(EntityView::round(EntityKind::Alien, alien.pos, alien.radius));
        }

        for bullet in self.bullets.iter().filter(|b| !b.is_destroyed()) {
            let kind = if bullet.is_hostile() { EntityKind::AlienBullet } else { EntityKind::PlayerBullet };
            entities.push(EntityView::round(kind, bullet.pos, bullet.radius));
        }

        let ship = &self.ship;
        let ship_visible = self.phase == GamePhase::Playing
            && !ship.is_destroyed()
            && !(ship.is_invulnerable(now_ms) && ship_blink_hidden(now_ms));
        if ship_visible {
            entities.push(EntityView {
                kind: EntityKind::Ship,
                pos: ship.pos,
                rotation: ship.heading,
                radius: ship.radius,
                age_ratio: 0.0,
                outline: ship.outline().to_vec(),
                thrusting: self.thrust_audible,
            });
            if ship.shields_active() {
                entities.push(EntityView::round(EntityKind::Shield, ship.pos, SHIELD_RADIUS));
            }
        }

        for particle in &self.particles {
            let mut view = EntityView::round(EntityKind::Particle, particle.pos, 1.0);
            view.age_ratio = particle.age_ratio();
            entities.push(view);
        }

        for piece in &self.debris {
            entities.push(EntityView {
                kind: EntityKind::Debris,
                pos: piece.pos,
                rotation: piece.rotation,
                radius: 0.0,
                age_ratio: piece.age_ratio(),
                outline: piece.segment.iter().map(|&v| rotate_point(v, piece.rotation)).collect(),
                thrusting: false,
            });
        }

        FrameSnapshot {
            frame: self.frame,
            entities,
            hud: HudView {
                score: self.score,
                lives: self.lives,
                level: self.level,
                shield_charge: ship.shield_charge(),
                shield_pulse: if ship.shields_active() { shield_pulse(now_ms) } else { 0.0 },
                shields_active: ship.shields_active(),
                phase: self.phase,
                paused: self.paused,
            },
        }
    }
}
