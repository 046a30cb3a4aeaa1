//! Entity lifecycle: spawning, respawning, level turnover and pruning

use glam::Vec2;
use rand::Rng;

use super::entities::{Alien, Asteroid, AsteroidSize, Particle};
use super::physics::Arena;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// A level's worth of large asteroids, kept clear of `avoid`
pub fn initial_asteroids<R: Rng>(level: u32, arena: &Arena, avoid: Vec2, rng: &mut R) -> Vec<Asteroid> {
    let count = BASE_ASTEROID_COUNT + level;
    (0..count)
        .map(|_| {
            let pos = random_position_away_from(arena, avoid, SAFE_SPAWN_DISTANCE, rng);
            Asteroid::with_random_heading(pos, AsteroidSize::Large, rng)
        })
        .collect()
}

/// Rejection-sample a field position farther than `min_distance` from
/// `avoid`. Gives up after `PLACEMENT_ATTEMPTS` and keeps the last sample.
pub fn random_position_away_from<R: Rng>(arena: &Arena, avoid: Vec2, min_distance: f32, rng: &mut R) -> Vec2 {
    let mut pos = random_position(arena, rng);
    for _ in 1..PLACEMENT_ATTEMPTS {
        if pos.distance(avoid) > min_distance {
            return pos;
        }
        pos = random_position(arena, rng);
    }
    if pos.distance(avoid) <= min_distance {
        log::debug!("Placement near {:?} gave up after {} attempts", avoid, PLACEMENT_ATTEMPTS);
    }
    pos
}

fn random_position<R: Rng>(arena: &Arena, rng: &mut R) -> Vec2 {
    Vec2::new(rng.random_range(0.0..arena.width), rng.random_range(0.0..arena.height))
}

/// Burst of `count` particles at `pos`
pub fn explosion<R: Rng>(particles: &mut Vec<Particle>, pos: Vec2, count: usize, rng: &mut R) {
    particles.extend((0..count).map(|_| Particle::new(pos, rng)));
}

/// Aliens come one at a time, and only after the spawn interval has elapsed
pub fn should_spawn_alien(state: &GameState, now_ms: u64) -> bool {
    state.aliens.is_empty() && now_ms.saturating_sub(state.last_alien_spawn_ms) > ALIEN_SPAWN_INTERVAL_MS
}

/// Place an alien just outside a random edge, aimed at the field center
pub fn spawn_alien(state: &mut GameState, now_ms: u64) {
    let arena = state.arena;
    let rng = &mut state.rng;
    let pos = match rng.random_range(0..4) {
        0 => Vec2::new(-ALIEN_SPAWN_OFFSET, rng.random_range(0.0..arena.height)),
        1 => Vec2::new(arena.width + ALIEN_SPAWN_OFFSET, rng.random_range(0.0..arena.height)),
        2 => Vec2::new(rng.random_range(0.0..arena.width), -ALIEN_SPAWN_OFFSET),
        _ => Vec2::new(rng.random_range(0.0..arena.width), arena.height + ALIEN_SPAWN_OFFSET),
    };
    log::debug!("Alien spawned at ({:.0}, {:.0})", pos.x, pos.y);
    state.aliens.push(Alien::new(pos, &arena));
    state.last_alien_spawn_ms = now_ms;
    state.push_event(GameEvent::AlienSpawned);
}

/// True when no asteroid or alien is within the safe radius of the spawn point
pub fn spawn_point_is_clear(state: &GameState) -> bool {
    let spawn = state.ship_spawn_point();
    let asteroids = state.asteroids.iter().map(|a| a.pos);
    let aliens = state.aliens.iter().map(|a| a.pos);
    asteroids.chain(aliens).all(|p| p.distance(spawn) > SAFE_SPAWN_DISTANCE)
}

/// Count down the respawn timer; bring the ship back once the spawn point
/// is clear, otherwise re-arm with the shorter retry delay.
pub fn update_respawn(state: &mut GameState, now_ms: u64) {
    let Some(frames) = state.respawn_timer else { return };
    if frames > 1 {
        state.respawn_timer = Some(frames - 1);
        return;
    }
    if spawn_point_is_clear(state) {
        let spawn = state.ship_spawn_point();
        state.ship.respawn(spawn, now_ms);
        state.respawn_timer = None;
        state.push_event(GameEvent::ShipRespawned);
    } else {
        log::debug!("Spawn point occupied, retrying respawn");
        state.respawn_timer = Some(RESPAWN_RETRY_FRAMES);
    }
}

/// Drop expired and destroyed entities
pub fn prune(state: &mut GameState) {
    let arena = state.arena;
    state.bullets.retain(|b| !b.is_expired());
    state.particles.retain(|p| !p.is_expired());
    state.debris.retain(|d| !d.is_expired());
    state.aliens.retain(|a| !a.should_remove(&arena));
    state.asteroids.retain(|a| !a.is_destroyed());
}

/// Advance to the next level: new field, transient entities cleared
pub fn advance_level(state: &mut GameState) {
    state.level += 1;
    let spawn = state.ship_spawn_point();
    state.asteroids = initial_asteroids(state.level, &state.arena, spawn, &mut state.rng);
    state.bullets.clear();
    state.aliens.clear();
    state.particles.clear();
    state.debris.clear();
    log::info!("Level {} ({} asteroids)", state.level, state.asteroids.len());
    state.push_event(GameEvent::LevelUp { level: state.level });
}
