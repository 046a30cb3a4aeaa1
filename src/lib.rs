//! Rockfield - a wraparound asteroid-field arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, game state)
//! - `audio`: Cue routing from gameplay events to an audio sink
//! - `platform`: Clock abstraction
//! - `settings`: JSON-backed runtime settings

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;

pub use audio::{AudioCue, AudioDirector, AudioSink, LoopHandle};
pub use platform::{Clock, FixedStepClock, SystemClock};
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical play field dimensions
    pub const WIDTH: f32 = 1024.0;
    pub const HEIGHT: f32 = 768.0;

    /// Nominal frame rate the per-frame constants are tuned for
    pub const FRAMES_PER_SECOND: u32 = 60;
    /// Milliseconds per frame at the nominal rate
    pub const FRAME_MS: f64 = 1000.0 / FRAMES_PER_SECOND as f64;

    /// Ship spawn point (screen center)
    pub const SHIP_SPAWN_X: f32 = WIDTH / 2.0;
    pub const SHIP_SPAWN_Y: f32 = HEIGHT / 2.0;

    /// Ship movement
    pub const SHIP_RADIUS: f32 = 8.0;
    pub const SHIP_THRUST: f32 = 0.5;
    pub const SHIP_MAX_SPEED: f32 = 8.0;
    pub const SHIP_TURN_RATE: f32 = 4.5; // degrees per frame
    pub const SHIP_FRICTION: f32 = 0.98;
    pub const SHOT_COOLDOWN_MS: u64 = 150;
    pub const INVULNERABILITY_MS: u64 = 3000;

    /// Respawn timing (frames)
    pub const RESPAWN_DELAY_FRAMES: u32 = 3 * FRAMES_PER_SECOND;
    pub const RESPAWN_RETRY_FRAMES: u32 = FRAMES_PER_SECOND / 2;
    /// Nothing may sit this close to the spawn point when the ship appears
    pub const SAFE_SPAWN_DISTANCE: f32 = 100.0;

    /// Shields
    pub const SHIELD_RADIUS: f32 = 24.0;
    pub const SHIELD_BOUNCE_FORCE: f32 = 3.0;
    pub const SHIELD_DRAIN_PER_FRAME: f32 = 1.0 / 120.0;
    pub const SHIELD_RECHARGE_PER_FRAME: f32 = 1.0 / 300.0;
    /// Shield pulse period for presentation (ms)
    pub const SHIELD_PULSE_MS: u64 = 400;

    /// Flip maneuver angular rate (degrees per frame)
    pub const FLIP_RATE: f32 = 9.0;

    /// Bullets
    pub const BULLET_RADIUS: f32 = 2.0;
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_LIFETIME: u32 = 60;

    /// Aliens
    pub const ALIEN_RADIUS: f32 = 15.0;
    pub const ALIEN_SPEED: f32 = 2.0;
    pub const ALIEN_POINTS: u64 = 1000;
    pub const ALIEN_SHOT_INTERVAL: u32 = 120;
    pub const ALIEN_AIM_JITTER: f32 = 15.0; // degrees either side
    pub const ALIEN_REMOVAL_MARGIN: f32 = 100.0;
    pub const ALIEN_SPAWN_OFFSET: f32 = 50.0;
    pub const ALIEN_SPAWN_INTERVAL_MS: u64 = 60_000;

    /// Particles and debris
    pub const PARTICLE_LIFETIME: u32 = 60;
    pub const PARTICLE_FRICTION: f32 = 0.98;
    pub const PARTICLE_MIN_SPEED: f32 = 0.5;
    pub const PARTICLE_MAX_SPEED: f32 = 3.0;
    pub const DEBRIS_LIFETIME: u32 = 120;
    pub const DEBRIS_FRICTION: f32 = 0.99;
    pub const DEBRIS_VELOCITY_JITTER: f32 = 4.0;
    pub const DEBRIS_SPIN_RANGE: f32 = 8.0;

    /// Explosion particle counts
    pub const ASTEROID_BURST: usize = 8;
    pub const ALIEN_BURST: usize = 12;
    pub const SHIP_BURST: usize = 15;
    pub const SHIELD_BURST: usize = 3;

    /// Lives and progression
    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;
    pub const EXTRA_LIFE_THRESHOLDS: [u64; 3] = [5_000, 10_000, 25_000];
    pub const BASE_ASTEROID_COUNT: u32 = 4;
    /// Placement attempts before falling back to an unconstrained position
    pub const PLACEMENT_ATTEMPTS: u32 = 64;

    /// Heartbeat interval bounds (frames)
    pub const BEAT_MAX_INTERVAL: u32 = 60;
    pub const BEAT_MIN_INTERVAL: u32 = 15;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Signed shortest difference `to - from` in degrees, in [-180, 180)
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Unit vector for a heading in degrees (0 = up, clockwise positive)
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}

/// Heading in degrees of a direction vector (inverse of [`heading_vector`])
#[inline]
pub fn vector_heading(dir: Vec2) -> f32 {
    normalize_degrees(dir.x.atan2(-dir.y).to_degrees())
}

/// Rotate a local-space point by `degrees` (screen coordinates, y down)
#[inline]
pub fn rotate_point(p: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}
