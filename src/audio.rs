//! Audio seam
//!
//! The simulation never synthesizes sound; it emits `GameEvent`s and the
//! host maps them onto an `AudioSink`. The sink is injected into whatever
//! drives the frame loop, so the core stays free of audio globals and runs
//! headless in tests.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Actor hops a tile
    Hop,
    /// Actor fell in the water
    Splash,
    /// Actor hit by a vehicle
    Crash,
    /// Home slot filled
    Victory,
    /// All home slots filled, next level
    LevelUp,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    /// Map a simulation event to its sound
    pub fn from_event(event: GameEvent) -> Self {
        match event {
            GameEvent::Hop => SoundEffect::Hop,
            GameEvent::Splash => SoundEffect::Splash,
            GameEvent::Crash => SoundEffect::Crash,
            GameEvent::Victory => SoundEffect::Victory,
            GameEvent::LevelUp => SoundEffect::LevelUp,
            GameEvent::GameOver => SoundEffect::GameOver,
        }
    }
}

/// Fire-and-forget playback; implementations must not block the frame loop
pub trait AudioSink {
    fn play(&self, effect: SoundEffect);

    /// Convenience: drain a frame's events into the sink
    fn play_events(&self, events: &[GameEvent]) {
        for &event in events {
            self.play(SoundEffect::from_event(event));
        }
    }
}

/// Silent sink for tests and headless runs
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&self, _effect: SoundEffect) {}
}

/// Logs each effect instead of playing it (headless demo runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&self, effect: SoundEffect) {
        log::debug!("sfx: {:?}", effect);
    }
}
