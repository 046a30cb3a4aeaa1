//! Audio cues and the event-to-sound director
//!
//! The simulation only queues [`GameEvent`]s. [`AudioDirector`] turns them
//! into fire-and-forget calls on an [`AudioSink`] supplied by the host, and
//! owns the handles of the looping sounds (thrust, saucer).

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{AsteroidSize, GameEvent};

/// Symbolic sound names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    Fire,
    Thrust,
    BangLarge,
    BangMedium,
    BangSmall,
    SaucerLoop,
    Beat,
    LevelUp,
    ExtraLife,
}

/// Opaque id of a running loop, issued by the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle(pub u64);

/// Where sounds go. Missing cues and playback failures are the sink's
/// problem; nothing is reported back.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue, volume: f32);
    /// Start a loop. `None` when the sink could not start it.
    fn play_looping(&mut self, cue: AudioCue, volume: f32) -> Option<LoopHandle>;
    fn stop(&mut self, handle: LoopHandle);
}

/// Sink that drops everything
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue, _volume: f32) {}
    fn play_looping(&mut self, _cue: AudioCue, _volume: f32) -> Option<LoopHandle> {
        None
    }
    fn stop(&mut self, _handle: LoopHandle) {}
}

/// Sink that writes every call to the log, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio {
    next_handle: u64,
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue, volume: f32) {
        log::trace!("play {:?} @ {:.2}", cue, volume);
    }

    fn play_looping(&mut self, cue: AudioCue, volume: f32) -> Option<LoopHandle> {
        self.next_handle += 1;
        log::trace!("loop {:?} @ {:.2} -> #{}", cue, volume, self.next_handle);
        Some(LoopHandle(self.next_handle))
    }

    fn stop(&mut self, handle: LoopHandle) {
        log::trace!("stop #{}", handle.0);
    }
}

/// Maps gameplay events to sink calls
#[derive(Debug)]
pub struct AudioDirector {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    thrust_loop: Option<LoopHandle>,
    saucer_loop: Option<LoopHandle>,
}

impl Default for AudioDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDirector {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            thrust_loop: None,
            saucer_loop: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut director = Self::new();
        director.set_master_volume(settings.master_volume);
        director.set_sfx_volume(settings.sfx_volume);
        director.set_muted(settings.muted);
        director
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute. Applies to cues issued after the call.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume * self.sfx_volume }
    }

    /// Whether any loop is believed to be running
    pub fn has_loops(&self) -> bool {
        self.thrust_loop.is_some() || self.saucer_loop.is_some()
    }

    /// Play the sounds for a batch of drained events
    pub fn dispatch<S: AudioSink + ?Sized>(&mut self, events: &[GameEvent], sink: &mut S) {
        for event in events {
            self.handle(*event, sink);
        }
    }

    fn handle<S: AudioSink + ?Sized>(&mut self, event: GameEvent, sink: &mut S) {
        match event {
            GameEvent::ShotFired => self.one_shot(AudioCue::Fire, 1.0, sink),
            GameEvent::AsteroidDestroyed { size } => {
                let cue = match size {
                    AsteroidSize::Large => AudioCue::BangLarge,
                    AsteroidSize::Medium => AudioCue::BangMedium,
                    AsteroidSize::Small => AudioCue::BangSmall,
                };
                self.one_shot(cue, 1.0, sink);
            }
            GameEvent::AlienSpawned => {
                if self.saucer_loop.is_none() {
                    self.saucer_loop = self.start_loop(AudioCue::SaucerLoop, sink);
                }
            }
            GameEvent::AlienDestroyed => self.one_shot(AudioCue::BangLarge, 1.0, sink),
            GameEvent::AliensCleared => stop_loop(&mut self.saucer_loop, sink),
            GameEvent::ShieldContact => self.one_shot(AudioCue::BangSmall, 0.5, sink),
            GameEvent::ShipDestroyed => {
                stop_loop(&mut self.thrust_loop, sink);
                self.one_shot(AudioCue::BangLarge, 1.0, sink);
            }
            GameEvent::ThrustStarted => {
                if self.thrust_loop.is_none() {
                    self.thrust_loop = self.start_loop(AudioCue::Thrust, sink);
                }
            }
            GameEvent::ThrustStopped => stop_loop(&mut self.thrust_loop, sink),
            GameEvent::ExtraLife { .. } => self.one_shot(AudioCue::ExtraLife, 1.0, sink),
            GameEvent::LevelUp { .. } => self.one_shot(AudioCue::LevelUp, 1.0, sink),
            GameEvent::Beat => self.one_shot(AudioCue::Beat, 0.6, sink),
            GameEvent::NewGame | GameEvent::GameOver { .. } => self.stop_all(sink),
            GameEvent::ShipRespawned => {}
        }
    }

    fn one_shot<S: AudioSink + ?Sized>(&self, cue: AudioCue, gain: f32, sink: &mut S) {
        let vol = self.effective_volume() * gain;
        if vol > 0.0 {
            sink.play(cue, vol);
        }
    }

    fn start_loop<S: AudioSink + ?Sized>(&self, cue: AudioCue, sink: &mut S) -> Option<LoopHandle> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return None;
        }
        sink.play_looping(cue, vol)
    }

    /// Stop every running loop
    pub fn stop_all<S: AudioSink + ?Sized>(&mut self, sink: &mut S) {
        stop_loop(&mut self.thrust_loop, sink);
        stop_loop(&mut self.saucer_loop, sink);
    }
}

fn stop_loop<S: AudioSink + ?Sized>(slot: &mut Option<LoopHandle>, sink: &mut S) {
    if let Some(handle) = slot.take() {
        sink.stop(handle);
    }
}
