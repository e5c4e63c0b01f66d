//! Submersible platform dive cycle
//!
//! Turtle rafts cycle Surface -> Diving -> Submerged -> Rising -> Surface.
//! The table below is the single source of truth for durations and
//! successors; safety classification reads the phase, rendering reads the
//! fractional progress.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Phase of the dive cycle. Only `Submerged` is unsafe to stand on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DivePhase {
    Surface,
    Diving,
    Submerged,
    Rising,
}

/// Extra dwell rolled when re-entering `Surface`, so same-lane rafts drift
/// out of sync
pub const SURFACE_JITTER_MS: f32 = 1500.0;

/// Window at either end of `Submerged` that still counts as safe on the
/// easiest level
pub const SUBMERGED_GRACE_MS: f32 = 250.0;

impl DivePhase {
    /// Configured phase duration in milliseconds
    pub fn duration_ms(self) -> f32 {
        match self {
            DivePhase::Surface => 4000.0,
            DivePhase::Diving => 900.0,
            DivePhase::Submerged => 1800.0,
            DivePhase::Rising => 900.0,
        }
    }

    /// Successor in the cycle
    pub fn next(self) -> DivePhase {
        match self {
            DivePhase::Surface => DivePhase::Diving,
            DivePhase::Diving => DivePhase::Submerged,
            DivePhase::Submerged => DivePhase::Rising,
            DivePhase::Rising => DivePhase::Surface,
        }
    }
}

/// Per-raft dive state: current phase plus milliseconds remaining in it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiveState {
    pub phase: DivePhase,
    pub timer_ms: f32,
}

impl DiveState {
    /// Fresh raft on the surface, with a randomized head start into the
    /// cycle so spawned neighbors don't blink in unison
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            phase: DivePhase::Surface,
            timer_ms: rng.random_range(0.5..1.0) * DivePhase::Surface.duration_ms(),
        }
    }

    /// Count the timer down by elapsed time, applying at most one phase
    /// transition per call. A deficit left by a long stall is carried into
    /// the next phase's countdown rather than cascading through the cycle.
    pub fn advance(&mut self, elapsed_ms: f32, rng: &mut impl Rng) {
        self.timer_ms -= elapsed_ms;
        if self.timer_ms > 0.0 {
            return;
        }

        let leftover = self.timer_ms; // <= 0
        self.phase = self.phase.next();
        self.timer_ms = self.phase.duration_ms() + leftover;
        if self.phase == DivePhase::Surface {
            self.timer_ms += rng.random_range(0.0..SURFACE_JITTER_MS);
        }
    }

    /// Whether the raft currently supports an actor. With `forgiving` set
    /// (level 1), the first and last moments of `Submerged` still count.
    pub fn is_safe(&self, forgiving: bool) -> bool {
        match self.phase {
            DivePhase::Submerged => {
                if !forgiving {
                    return false;
                }
                let elapsed_in_phase = DivePhase::Submerged.duration_ms() - self.timer_ms;
                elapsed_in_phase <= SUBMERGED_GRACE_MS || self.timer_ms <= SUBMERGED_GRACE_MS
            }
            _ => true,
        }
    }

    /// Fraction of the current phase completed, 0..1 (drives render
    /// opacity/offset for Diving and Rising)
    pub fn progress(&self) -> f32 {
        let duration = self.phase.duration_ms();
        (1.0 - self.timer_ms / duration).clamp(0.0, 1.0)
    }
}
