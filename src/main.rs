//! Rockfield headless runner
//!
//! Drives the simulation from a fixed-step clock with a simple autopilot,
//! logging the HUD and audio cues. Usage: `rockfield [settings.json]`.

use std::time::{SystemTime, UNIX_EPOCH};

use rockfield::audio::LogAudio;
use rockfield::consts::SHIP_TURN_RATE;
use rockfield::sim::{EntityKind, FrameSnapshot, GamePhase, GameState, Presenter, TickInput, tick};
use rockfield::{AudioDirector, Clock, FixedStepClock, Settings, angle_delta, vector_heading};

/// Plays badly but keeps every subsystem busy
#[derive(Debug, Default)]
struct Autopilot {
    frame: u64,
}

impl Autopilot {
    fn input(&mut self, state: &GameState) -> TickInput {
        self.frame += 1;
        let mut input = TickInput::default();

        match state.phase {
            GamePhase::StartScreen => {
                input.shoot = self.frame % 120 == 0;
                return input;
            }
            GamePhase::GameOver => {
                input.shoot = self.frame % 180 == 0;
                return input;
            }
            GamePhase::Playing => {}
        }

        let ship = &state.ship;
        if ship.is_destroyed() {
            return input;
        }

        let nearest = state
            .asteroids
            .iter()
            .map(|a| (a.pos, a.pos.distance(ship.pos) - a.radius))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((target, gap)) = nearest {
            let delta = angle_delta(ship.heading, vector_heading(target - ship.pos));
            if delta.abs() > 150.0 {
                input.flip = true;
            } else {
                input.turn_left = delta < -SHIP_TURN_RATE;
                input.turn_right = delta > SHIP_TURN_RATE;
            }
            input.shoot = delta.abs() < 10.0 && self.frame % 2 == 0;
            input.shield = gap < 40.0 && ship.shield_charge() > 0.2;
            input.thrust = gap > 300.0 && self.frame % 8 == 0;
        }
        input
    }
}

/// Logs phase changes and a periodic HUD line
#[derive(Debug, Default)]
struct HudLog {
    last_phase: Option<GamePhase>,
}

impl Presenter for HudLog {
    fn present(&mut self, frame: &FrameSnapshot) {
        let hud = &frame.hud;
        if self.last_phase != Some(hud.phase) {
            log::info!("Phase: {:?}", hud.phase);
            self.last_phase = Some(hud.phase);
        }
        if frame.frame % 60 == 0 {
            log::debug!(
                "frame {} | score {} | lives {} | level {} | shield {:.0}% | rocks {} | aliens {}",
                frame.frame,
                hud.score,
                hud.lives,
                hud.level,
                hud.shield_charge * 100.0,
                frame.count(EntityKind::Asteroid),
                frame.count(EntityKind::Alien),
            );
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rockfield (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load_from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("Game initialized with seed: {}", seed);

    let mut state = GameState::new(seed);
    let mut clock = FixedStepClock::new();
    let mut director = AudioDirector::from_settings(&settings);
    let mut sink = LogAudio::default();
    let mut presenter = HudLog::default();
    let mut pilot = Autopilot::default();
    let mut last_frame = None;

    for _ in 0..settings.frames {
        let now = clock.now_ms();
        let input = pilot.input(&state);
        tick(&mut state, &input, now);

        let events = state.drain_events();
        director.dispatch(&events, &mut sink);

        let mut frame = state.snapshot(now);
        if !settings.particles {
            frame.entities.retain(|e| e.kind != EntityKind::Particle);
        }
        presenter.present(&frame);
        last_frame = Some(frame);
        clock.advance();
    }
    director.stop_all(&mut sink);

    log::info!(
        "Finished after {} frames: score {}, level {}, lives {}",
        clock.frames(),
        state.score,
        state.level,
        state.lives
    );

    if let (Some(path), Some(frame)) = (&settings.dump_snapshot, &last_frame) {
        match serde_json::to_string_pretty(frame) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Snapshot written to {}", path.display()),
                Err(e) => log::warn!("Could not write snapshot: {}", e),
            },
            Err(e) => log::warn!("Could not serialize snapshot: {}", e),
        }
    }
}
