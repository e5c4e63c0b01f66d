//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Driven only by elapsed frame time handed in by the host
//! - Seeded RNG only
//! - Stable hazard order (spawn order, never permuted)
//! - No rendering or platform dependencies

pub mod board;
pub mod dive;
pub mod spawn;
pub mod state;
pub mod tick;

pub use board::{Board, HazardKind, LaneDescriptor, LaneType, level_speed_multiplier};
pub use dive::{DivePhase, DiveState};
pub use spawn::{build_lanes, required_gap, road_min_gap};
pub use state::{
    Actor, DeathCause, DeathEffect, Direction, FrameSnapshot, GameEvent, GamePhase, GameState,
    Hazard, HomeSlot, Lane, PowerUp, PowerUpKind,
};
pub use tick::{move_player, progressive_multiplier, tick};
