//! River Road - a road-and-river crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, hazards, collisions, run state)
//! - `audio`: Sound effect seam for the host's audio collaborator
//! - `highscores`: Top-10 leaderboard with LocalStorage persistence
//! - `settings`: Player preferences

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Square tile edge in pixels
    pub const TILE_SIZE: f32 = 32.0;
    /// Playfield columns
    pub const BOARD_COLS: u32 = 14;
    /// Playfield rows (home row at 0, start row at the bottom)
    pub const BOARD_ROWS: u32 = 13;
    /// Playfield width in pixels
    pub const BOARD_WIDTH: f32 = TILE_SIZE * BOARD_COLS as f32;
    /// Playfield height in pixels
    pub const BOARD_HEIGHT: f32 = TILE_SIZE * BOARD_ROWS as f32;

    /// Reference frame duration; hazard speeds are expressed in px per
    /// reference frame and scaled by actual elapsed time
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Elapsed time above this means the host was stalled or backgrounded;
    /// position updates are skipped for that frame
    pub const STALL_THRESHOLD_MS: f32 = 250.0;

    /// Hazards wrap once fully past the playfield edge plus this buffer
    pub const WRAP_BUFFER: f32 = TILE_SIZE * 2.0;

    /// Actor collision box edge (narrower than a tile)
    pub const ACTOR_SIZE: f32 = 24.0;
    /// Hop interpolation step in px per reference frame
    pub const HOP_STEP: f32 = 8.0;
    /// Edge shaved off both actor and vehicle intervals before road
    /// collision tests
    pub const ROAD_COLLISION_INSET: f32 = 4.0;
    /// Fraction of a support's displacement applied to a carried actor
    pub const CARRY_FACTOR: f32 = 0.75;

    /// Progressive speed multiplier at the start row (full speed at the
    /// home row, linear in between)
    pub const PROGRESSIVE_MIN: f32 = 0.6;
    /// Fixed global speed multiplier stacked on the progressive one
    pub const PROGRESSIVE_GLOBAL: f32 = 1.05;

    /// Number of home slots to fill per level
    pub const HOME_SLOTS: usize = 5;
    /// Horizontal tolerance for landing in a home slot
    pub const HOME_ALIGN_TOLERANCE: f32 = TILE_SIZE / 2.0;

    /// Score for reaching a previously-unvisited forward row
    pub const HOP_SCORE: u64 = 10;
    /// Score for filling a home slot
    pub const HOME_SCORE: u64 = 50;
    /// Score for filling all home slots
    pub const ALL_HOMES_SCORE: u64 = 1000;
    /// Extra completion score per level
    pub const LEVEL_BONUS_PER_LEVEL: u64 = 100;

    /// Lives at run start and after a continue
    pub const START_LIVES: u8 = 3;
    /// Lives cap (extra-life power-ups saturate here)
    pub const MAX_LIVES: u8 = 5;
    /// Continues allowed per run
    pub const MAX_CONTINUES: u32 = 3;
    /// Window after game over during which a continue is accepted
    pub const CONTINUE_WINDOW_MS: f32 = 10_000.0;

    /// Death animation pause before respawn
    pub const DEATH_PAUSE_MS: f32 = 1_000.0;
    /// Invincibility power-up duration
    pub const INVINCIBILITY_MS: f32 = 5_000.0;
    /// Power-up pickup radius from actor center
    pub const PICKUP_RADIUS: f32 = 24.0;
    /// Percent chance a power-up spawns at level start / after a home fill
    pub const POWERUP_CHANCE_PCT: u32 = 30;
}

/// One-time browser setup: panic hook plus console logging
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("River Road core loaded");
}

/// Y coordinate (top edge) of a row
#[inline]
pub fn row_y(row: u32) -> f32 {
    row as f32 * consts::TILE_SIZE
}

/// X coordinate (left edge) of a column
#[inline]
pub fn col_x(col: u32) -> f32 {
    col as f32 * consts::TILE_SIZE
}

/// Continuous-interval overlap test on the horizontal axis
#[inline]
pub fn intervals_overlap(a_start: f32, a_end: f32, b_start: f32, b_end: f32) -> bool {
    a_start < b_end && b_start < a_end
}
