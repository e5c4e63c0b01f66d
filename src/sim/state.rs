//! Game state and core simulation types
//!
//! Everything the frame loop reads and writes lives here; the render
//! consumer only ever sees a `FrameSnapshot`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, HazardKind, LaneDescriptor, LaneType};
use super::dive::DiveState;
use super::spawn;
use crate::consts::*;
use crate::row_y;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Attract mode - hazards animate, no actor in play
    Ready,
    /// Active gameplay
    Playing,
    /// Death animation pause; actor input is ignored
    Dying,
    /// Run ended; a continue may be accepted while the window is open
    GameOver,
}

/// Discrete hop directions delivered by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What ended the actor's life (selects the death animation and sound)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Hit by a vehicle
    Crash,
    /// Fell in the water (gap, submerged raft, carried off, missed home)
    Splash,
}

/// Fire-and-forget notifications for the audio/render collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Hop,
    Splash,
    Crash,
    /// A home slot was filled
    Victory,
    /// All home slots filled, level advanced
    LevelUp,
    GameOver,
}

/// A moving object in a lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    /// Left edge, pixels; runs past the playfield into the wrap buffer
    pub x: f32,
    pub row: u32,
    pub width: f32,
    /// Scalar speed in px per reference frame (direction lives on the lane)
    pub speed: f32,
    /// Sprite variant rolled at spawn
    pub color_variant: u8,
    /// Dive cycle, submersible kinds only
    pub dive: Option<DiveState>,
}

impl Hazard {
    pub fn y(&self) -> f32 {
        row_y(self.row)
    }

    /// Horizontal extent [left, right)
    pub fn interval(&self) -> (f32, f32) {
        (self.x, self.x + self.width)
    }

    /// Whether an actor may stand on this hazard right now
    pub fn is_safe_support(&self, forgiving: bool) -> bool {
        match &self.dive {
            Some(dive) => dive.is_safe(forgiving),
            None => self.kind.is_support(),
        }
    }
}

/// Runtime lane: descriptor plus its current hazards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lane {
    pub descriptor: LaneDescriptor,
    /// Minimum spacing between hazards, fixed at generation for this level
    pub min_gap: f32,
    /// Stable spawn order; never reordered (wrap processing depends on it)
    pub hazards: Vec<Hazard>,
}

/// The player-controlled actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Current center position in pixels
    pub pos: Vec2,
    /// Grid-aligned hop destination (center of the target tile)
    pub target: Vec2,
    /// Mid-hop flag; collision and support are only evaluated when clear
    pub moving: bool,
    /// Lowest (most forward) row reached since the last reset; forward
    /// progress past it scores exactly once
    pub best_row: u32,
}

impl Actor {
    pub fn at(start: Vec2) -> Self {
        Self {
            pos: start,
            target: start,
            moving: false,
            best_row: (start.y / TILE_SIZE) as u32,
        }
    }

    /// Row index of the current position
    pub fn row(&self) -> u32 {
        (self.pos.y / TILE_SIZE) as u32
    }

    /// Row index of the hop destination
    pub fn target_row(&self) -> u32 {
        (self.target.y / TILE_SIZE) as u32
    }

    /// Horizontal collision extent
    pub fn interval(&self) -> (f32, f32) {
        (self.pos.x - ACTOR_SIZE / 2.0, self.pos.x + ACTOR_SIZE / 2.0)
    }

    pub fn reset(&mut self, start: Vec2) {
        *self = Self::at(start);
    }
}

/// One of the five goal slots on the home row
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HomeSlot {
    /// X center of the slot
    pub x: f32,
    pub filled: bool,
}

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    ExtraLife,
    Invincibility,
}

/// At most one power-up exists at a time, sitting on the median strip
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub collected: bool,
}

/// Transient death animation state, read by the renderer and used to gate
/// respawn
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeathEffect {
    pub cause: DeathCause,
    pub pos: Vec2,
    pub timer_ms: f32,
}

fn skipped_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state, mutated in place each frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Injected random source (respawn jitter, dive dwell, power-up rolls)
    #[serde(skip, default = "skipped_rng")]
    pub rng: Pcg32,
    pub board: Board,
    pub lanes: Vec<Lane>,
    pub actor: Actor,
    pub homes: Vec<HomeSlot>,
    pub power_up: Option<PowerUp>,
    pub level: u32,
    pub lives: u8,
    pub score: u64,
    pub continues_used: u32,
    pub phase: GamePhase,
    pub death_effect: Option<DeathEffect>,
    /// Invincibility countdown; collecting again resets rather than stacks
    pub invincible_ms: f32,
    /// Continue acceptance countdown, armed on game over
    pub continue_window_ms: f32,
    /// Total simulated time
    pub time_ms: f64,
    pub frame_count: u64,
    /// Events accumulated this frame, drained by the collaborators
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state in attract mode with the given seed
    pub fn new(seed: u64) -> Self {
        let board = Board::classic();
        let mut rng = Pcg32::seed_from_u64(seed);
        let lanes = spawn::build_lanes(&board, 1, &mut rng);
        let actor = Actor::at(board.start_position());
        let homes = board
            .home_slot_centers()
            .iter()
            .map(|&x| HomeSlot { x, filled: false })
            .collect();

        Self {
            seed,
            rng,
            board,
            lanes,
            actor,
            homes,
            power_up: None,
            level: 1,
            lives: START_LIVES,
            score: 0,
            continues_used: 0,
            phase: GamePhase::Ready,
            death_effect: None,
            invincible_ms: 0.0,
            continue_window_ms: 0.0,
            time_ms: 0.0,
            frame_count: 0,
            events: Vec::new(),
        }
    }

    /// Reset everything to a fresh run at level 1
    pub fn start_game(&mut self) {
        log::info!("starting run, seed {}", self.seed);
        self.level = 1;
        self.lives = START_LIVES;
        self.score = 0;
        self.continues_used = 0;
        self.invincible_ms = 0.0;
        self.continue_window_ms = 0.0;
        self.death_effect = None;
        for slot in &mut self.homes {
            slot.filled = false;
        }
        self.lanes = spawn::build_lanes(&self.board, self.level, &mut self.rng);
        self.actor.reset(self.board.start_position());
        self.roll_power_up();
        self.phase = GamePhase::Playing;
    }

    /// Resume a lost run: lives and position reset, score kept. Refused
    /// past the continue limit or once the window has lapsed.
    pub fn continue_game(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        if self.continues_used >= MAX_CONTINUES {
            log::info!("continue refused: limit reached");
            return false;
        }
        if self.continue_window_ms <= 0.0 {
            log::info!("continue refused: window lapsed");
            return false;
        }

        self.continues_used += 1;
        self.lives = START_LIVES;
        self.invincible_ms = 0.0;
        self.continue_window_ms = 0.0;
        self.death_effect = None;
        self.actor.reset(self.board.start_position());
        self.phase = GamePhase::Playing;
        log::info!(
            "continue {}/{} accepted, score kept at {}",
            self.continues_used,
            MAX_CONTINUES,
            self.score
        );
        true
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain the events accumulated since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Roll a fresh power-up onto the median strip (level start and after
    /// each home fill); any previous instance is replaced
    pub fn roll_power_up(&mut self) {
        if self.rng.random_range(0..100u32) >= POWERUP_CHANCE_PCT {
            self.power_up = None;
            return;
        }

        let median_row = self
            .board
            .lanes
            .iter()
            .filter(|l| l.lane_type == LaneType::Safe)
            .map(|l| l.row)
            .find(|&r| r != BOARD_ROWS - 1)
            .unwrap_or(6);
        let col = self.rng.random_range(1..BOARD_COLS - 1);
        let kind = if self.rng.random_range(0..100u32) < 40 {
            PowerUpKind::ExtraLife
        } else {
            PowerUpKind::Invincibility
        };

        self.power_up = Some(PowerUp {
            pos: Vec2::new(
                col as f32 * TILE_SIZE + TILE_SIZE / 2.0,
                row_y(median_row) + TILE_SIZE / 2.0,
            ),
            kind,
            collected: false,
        });
        log::debug!("power-up spawned: {:?}", kind);
    }

    /// Immutable-for-the-frame view for the render consumer
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            actor: self.actor.clone(),
            lanes: self.lanes.clone(),
            homes: self.homes.clone(),
            power_up: self.power_up,
            level: self.level,
            lives: self.lives,
            score: self.score,
            phase: self.phase,
            invincible: self.is_invincible(),
            death_effect: self.death_effect,
        }
    }
}

/// Published at frame end; the renderer must not reach back into the live
/// state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub actor: Actor,
    pub lanes: Vec<Lane>,
    pub homes: Vec<HomeSlot>,
    pub power_up: Option<PowerUp>,
    pub level: u32,
    pub lives: u8,
    pub score: u64,
    pub phase: GamePhase,
    pub invincible: bool,
    pub death_effect: Option<DeathEffect>,
}
