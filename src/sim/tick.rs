//! Per-frame simulation tick
//!
//! One clock tick drives exactly one update pass:
//! input → physics → collisions → lifecycle/spawning → state checks.

use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::spawn::{advance_level, prune, should_spawn_alien, spawn_alien, update_respawn};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Player intents for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub turn_left: bool,
    pub turn_right: bool,
    pub thrust: bool,
    /// Fire (edge-triggered by the host)
    pub shoot: bool,
    /// Hold to keep shields up
    pub shield: bool,
    /// Pause toggle (edge-triggered)
    pub pause: bool,
    /// Start a 180° flip (edge-triggered)
    pub flip: bool,
}

impl TickInput {
    /// True when any intent is set
    pub fn any(&self) -> bool {
        self.turn_left || self.turn_right || self.thrust || self.shoot || self.shield || self.pause || self.flip
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    match state.phase {
        GamePhase::StartScreen => {
            if input.any() {
                state.reset(now_ms);
                return;
            }
            animate_field(state);
        }
        GamePhase::Playing => tick_playing(state, input, now_ms),
        GamePhase::GameOver => {
            if input.shoot {
                log::info!("Back to start screen");
                state.phase = GamePhase::StartScreen;
                return;
            }
            animate_field(state);
        }
    }
    state.frame += 1;
}

fn tick_playing(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if input.pause {
        state.paused = !state.paused;
        log::debug!("Paused: {}", state.paused);
        // Silence the engine for the pause; it resumes with the next thrust input
        if state.paused && state.thrust_audible {
            state.thrust_audible = false;
            state.push_event(GameEvent::ThrustStopped);
        }
    }
    if state.paused {
        return;
    }

    apply_input(state, input, now_ms);
    update_thrust_audio(state);
    step_physics(state);

    resolve_collisions(state, now_ms);
    if state.phase != GamePhase::Playing {
        // Ship went down for the last time this frame
        prune(state);
        return;
    }

    update_respawn(state, now_ms);
    if should_spawn_alien(state, now_ms) {
        spawn_alien(state, now_ms);
    }

    let had_aliens = !state.aliens.is_empty();
    prune(state);
    if state.asteroids.is_empty() {
        advance_level(state);
    }
    if had_aliens && state.aliens.is_empty() {
        state.push_event(GameEvent::AliensCleared);
    }

    update_beat(state);
}

fn apply_input(state: &mut GameState, input: &TickInput, now_ms: u64) {
    let ship = &mut state.ship;
    if ship.is_destroyed() {
        return;
    }

    if input.turn_left {
        ship.turn_left();
    }
    if input.turn_right {
        ship.turn_right();
    }
    if input.thrust {
        ship.thrust();
    }
    if input.flip {
        ship.start_flip();
    }
    if input.shield {
        ship.activate_shields();
    } else {
        ship.deactivate_shields();
    }
    if input.shoot {
        if let Some(bullet) = ship.shoot(now_ms) {
            state.bullets.push(bullet);
            state.push_event(GameEvent::ShotFired);
        }
    }
}

fn update_thrust_audio(state: &mut GameState) {
    let thrusting = state.ship.is_thrusting();
    if thrusting == state.thrust_audible {
        return;
    }
    state.thrust_audible = thrusting;
    state.push_event(if thrusting { GameEvent::ThrustStarted } else { GameEvent::ThrustStopped });
}

fn step_physics(state: &mut GameState) {
    let arena = state.arena;
    if !state.ship.is_destroyed() {
        state.ship.update(&arena);
    }
    // Aliens aim at where the ship is after this frame's move
    let target = (!state.ship.is_destroyed()).then_some(state.ship.pos);

    for bullet in state.bullets.iter_mut() {
        bullet.update(&arena);
    }
    for asteroid in state.asteroids.iter_mut() {
        asteroid.update(&arena);
    }
    for alien in state.aliens.iter_mut() {
        if let Some(shot) = alien.update(target, &arena, &mut state.rng) {
            state.bullets.push(shot);
        }
    }
    for particle in state.particles.iter_mut() {
        particle.update(&arena);
    }
    for piece in state.debris.iter_mut() {
        piece.update(&arena);
    }
}

/// Attract-mode and game-over motion: everything drifts, nothing collides,
/// nothing spawns, aliens hold fire.
fn animate_field(state: &mut GameState) {
    let arena = state.arena;
    for bullet in state.bullets.iter_mut() {
        bullet.update(&arena);
    }
    for asteroid in state.asteroids.iter_mut() {
        asteroid.update(&arena);
    }
    for alien in state.aliens.iter_mut() {
        alien.update(None, &arena, &mut state.rng);
    }
    for particle in state.particles.iter_mut() {
        particle.update(&arena);
    }
    for piece in state.debris.iter_mut() {
        piece.update(&arena);
    }
    prune(state);
}

/// Frames between heartbeats for a field of `asteroids` rocks
pub fn beat_interval(asteroids: usize) -> u32 {
    let crowd = asteroids.min(BEAT_MAX_INTERVAL as usize) as u32;
    (BEAT_MIN_INTERVAL + 5 * crowd).min(BEAT_MAX_INTERVAL)
}

fn update_beat(state: &mut GameState) {
    if state.beat_timer > 1 {
        state.beat_timer -= 1;
        return;
    }
    state.beat_timer = beat_interval(state.asteroids.len());
    state.push_event(GameEvent::Beat);
}
