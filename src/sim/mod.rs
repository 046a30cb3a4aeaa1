//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One update pass per clock tick
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each entity collection)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entities;
pub mod physics;
pub mod ship;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, collides, resolve_collisions, shield_bounce};
pub use entities::{Alien, Asteroid, AsteroidSize, Bullet, BulletOrigin, Particle, ShipDebris};
pub use physics::{Arena, Body, integrate, wrap_position};
pub use ship::Ship;
pub use snapshot::{EntityKind, EntityView, FrameSnapshot, HudView, Presenter};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, beat_interval, tick};
