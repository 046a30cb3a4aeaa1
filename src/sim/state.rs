//! Game state and core simulation types
//!
//! The world owns every entity collection plus the score, lives, level and
//! phase. Components receive `&mut GameState` explicitly; nothing reaches a
//! global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Alien, Asteroid, AsteroidSize, Bullet, Particle, ShipDebris};
use super::physics::Arena;
use super::ship::Ship;
use super::spawn;
use crate::consts::*;

/// Top-level mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Attract mode: the field drifts, no ship, any input starts a game
    StartScreen,
    /// Active gameplay (see `GameState::paused`)
    Playing,
    /// Out of lives; the field keeps drifting until restart
    GameOver,
}

/// Something that happened during a tick, for audio and other observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    NewGame,
    ShotFired,
    AsteroidDestroyed { size: AsteroidSize },
    AlienSpawned,
    AlienDestroyed,
    /// The last live alien left the field or was destroyed
    AliensCleared,
    ShieldContact,
    ShipDestroyed,
    ShipRespawned,
    ExtraLife { lives: u8 },
    LevelUp { level: u32 },
    GameOver { score: u64 },
    ThrustStarted,
    ThrustStopped,
    Beat,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Field dimensions
    pub arena: Arena,
    pub phase: GamePhase,
    /// Sub-flag of `Playing`; halts physics, collisions and spawning
    pub paused: bool,
    pub score: u64,
    pub lives: u8,
    /// Current level (1-based)
    pub level: u32,
    /// Frames simulated since construction
    pub frame: u64,
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub aliens: Vec<Alien>,
    pub particles: Vec<Particle>,
    pub debris: Vec<ShipDebris>,
    /// Frames until the next respawn attempt while the ship is down
    pub respawn_timer: Option<u32>,
    /// Clock time of the last alien spawn (or of the game start)
    pub last_alien_spawn_ms: u64,
    /// Index of the next unclaimed entry in `EXTRA_LIFE_THRESHOLDS`
    pub next_extra_life: usize,
    /// Frames until the next heartbeat
    pub beat_timer: u32,
    /// Whether the thrust loop is currently audible
    pub(crate) thrust_audible: bool,
    pub(crate) rng: Pcg32,
    /// Undrained events are not part of a saved game
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game sitting on the start screen
    pub fn new(seed: u64) -> Self {
        Self::with_arena(seed, Arena::default())
    }

    pub fn with_arena(seed: u64, arena: Arena) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawn_point = ship_spawn_point(&arena);
        let asteroids = spawn::initial_asteroids(1, &arena, spawn_point, &mut rng);

        Self {
            seed,
            arena,
            phase: GamePhase::StartScreen,
            paused: false,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            frame: 0,
            ship: Ship::new(spawn_point),
            asteroids,
            bullets: Vec::new(),
            aliens: Vec::new(),
            particles: Vec::new(),
            debris: Vec::new(),
            respawn_timer: None,
            last_alien_spawn_ms: 0,
            next_extra_life: 0,
            beat_timer: BEAT_MAX_INTERVAL,
            thrust_audible: false,
            rng,
            events: Vec::new(),
        }
    }

    /// Full reset into `Playing`: fresh ship, level 1 field, zeroed counters
    pub fn reset(&mut self, now_ms: u64) {
        let spawn_point = self.ship_spawn_point();
        self.phase = GamePhase::Playing;
        self.paused = false;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.level = 1;
        self.ship = Ship::new(spawn_point);
        self.asteroids = spawn::initial_asteroids(self.level, &self.arena, spawn_point, &mut self.rng);
        self.bullets.clear();
        self.aliens.clear();
        self.particles.clear();
        self.debris.clear();
        self.respawn_timer = None;
        self.last_alien_spawn_ms = now_ms;
        self.next_extra_life = 0;
        self.beat_timer = BEAT_MAX_INTERVAL;
        self.thrust_audible = false;
        self.push_event(GameEvent::NewGame);
        log::info!("New game (seed {}), {} asteroids", self.seed, self.asteroids.len());
    }

    /// Where the ship appears
    pub fn ship_spawn_point(&self) -> Vec2 {
        ship_spawn_point(&self.arena)
    }

    /// Add points and grant any extra lives whose threshold was just crossed
    pub fn award(&mut self, points: u64) {
        self.score += points;
        while let Some(&threshold) = EXTRA_LIFE_THRESHOLDS.get(self.next_extra_life) {
            if self.score < threshold {
                break;
            }
            self.next_extra_life += 1;
            if self.lives < MAX_LIVES {
                self.lives += 1;
                log::debug!("Extra life at {} points ({} lives)", self.score, self.lives);
                self.push_event(GameEvent::ExtraLife { lives: self.lives });
            }
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

/// The ship always spawns at the center of the field
fn ship_spawn_point(arena: &Arena) -> Vec2 {
    arena.center()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_start_screen_with_field() {
        let state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::StartScreen);
        assert_eq!(state.asteroids.len(), 5);
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = GameState::new(1);
        state.score = 4000;
        state.lives = 1;
        state.level = 6;
        state.respawn_timer = Some(12);
        state.reset(2500);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.level, 1);
        assert_eq!(state.asteroids.len(), 5);
        assert!(state.bullets.is_empty() && state.aliens.is_empty());
        assert_eq!(state.respawn_timer, None);
        assert_eq!(state.last_alien_spawn_ms, 2500);
        assert_eq!(state.drain_events(), vec![GameEvent::NewGame]);
    }

    #[test]
    fn test_extra_life_thresholds() {
        let mut state = GameState::new(1);
        state.reset(0);
        state.award(4990);
        assert_eq!(state.lives, 3);
        state.award(20);
        assert_eq!(state.lives, 4);
        // Staying above a threshold grants nothing more
        state.award(100);
        assert_eq!(state.lives, 4);
        state.award(5000);
        assert_eq!(state.lives, 5);
        state.award(15_000);
        // Capped
        assert_eq!(state.lives, MAX_LIVES);
        assert_eq!(state.next_extra_life, 3);
    }

    #[test]
    fn test_restored_game_continues_identically() {
        use crate::sim::tick::{TickInput, tick};

        let mut state = GameState::new(77);
        state.reset(0);
        let thrust = TickInput { thrust: true, turn_right: true, shoot: true, ..Default::default() };
        for i in 0..30 {
            tick(&mut state, &thrust, i * 16);
        }

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        assert!(restored.pending_events().is_empty());

        for i in 30..200 {
            tick(&mut state, &thrust, i * 16);
            tick(&mut restored, &thrust, i * 16);
        }
        assert_eq!(restored.score, state.score);
        assert_eq!(restored.ship.pos, state.ship.pos);
        let a: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        let b: Vec<Vec2> = restored.asteroids.iter().map(|a| a.pos).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_extra_life_respects_cap() {
        let mut state = GameState::new(1);
        state.reset(0);
        state.lives = MAX_LIVES;
        state.award(5000);
        assert_eq!(state.lives, MAX_LIVES);
        assert!(!state.pending_events().iter().any(|e| matches!(e, GameEvent::ExtraLife { .. })));
    }
}
