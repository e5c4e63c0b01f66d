//! Per-frame simulation update
//!
//! Resolution order within a frame:
//!   1. Stall guard (oversized elapsed time skips position updates)
//!   2. Hazard advancement + dive cycle countdown
//!   3. Wrap respawn (original index order, never overlapping)
//!   4. Road ordering pass (gap enforcement)
//!   5. Actor hop interpolation
//!   6. Stationary resolution: water support, then collision/outcome
//!   7. Countdown timers (invincibility, death pause, continue window)
//!
//! Hazard positions are final before any support/collision read; nothing
//! here runs concurrently.

use super::board::LaneType;
use super::spawn::{self, required_gap};
use super::state::{
    DeathCause, DeathEffect, Direction, GameEvent, GamePhase, GameState, Lane, PowerUpKind,
};
use crate::consts::*;
use crate::intervals_overlap;

/// Advance the simulation by one frame of `elapsed_ms` real time
pub fn tick(state: &mut GameState, elapsed_ms: f32) {
    state.frame_count += 1;

    // Host was paused or backgrounded: keep the loop alive but do not let
    // hazards teleport across the board
    if elapsed_ms > STALL_THRESHOLD_MS {
        log::debug!("stalled frame ({elapsed_ms:.0} ms), skipping updates");
        return;
    }
    state.time_ms += elapsed_ms as f64;

    let dt_factor = elapsed_ms / REFERENCE_FRAME_MS;
    let progressive = progressive_multiplier(state.actor.row());

    advance_hazards(state, dt_factor, progressive, elapsed_ms);
    wrap_hazards(state);
    enforce_road_gaps(state);

    match state.phase {
        GamePhase::Ready => {}
        GamePhase::Playing => {
            advance_actor(state, dt_factor);
            if !state.actor.moving {
                resolve_stationary(state, dt_factor, progressive);
            }
        }
        GamePhase::Dying => advance_death(state, elapsed_ms),
        GamePhase::GameOver => {
            if state.continue_window_ms > 0.0 {
                state.continue_window_ms = (state.continue_window_ms - elapsed_ms).max(0.0);
            }
        }
    }

    if state.invincible_ms > 0.0 {
        state.invincible_ms = (state.invincible_ms - elapsed_ms).max(0.0);
    }
}

/// Hop the actor one tile in `direction`. No-op while mid-hop, while a
/// death is animating, after game over, or with no direction at all.
pub fn move_player(state: &mut GameState, direction: Option<Direction>) {
    let Some(direction) = direction else { return };
    if state.phase != GamePhase::Playing || state.actor.moving {
        return;
    }

    let mut target = state.actor.pos;
    match direction {
        Direction::Up => target.y -= TILE_SIZE,
        Direction::Down => target.y += TILE_SIZE,
        Direction::Left => target.x -= TILE_SIZE,
        Direction::Right => target.x += TILE_SIZE,
    }

    let half = ACTOR_SIZE / 2.0;
    target.x = target.x.clamp(half, BOARD_WIDTH - half);
    target.y = target
        .y
        .clamp(TILE_SIZE / 2.0, BOARD_HEIGHT - TILE_SIZE / 2.0);

    // Hop clamped away entirely (edge of board)
    if (target - state.actor.pos).length_squared() < 1.0 {
        return;
    }

    state.actor.target = target;
    state.actor.moving = true;
    state.push_event(GameEvent::Hop);

    // Forward progress to a never-visited row scores exactly once
    let target_row = (target.y / TILE_SIZE) as u32;
    if target_row < state.actor.best_row {
        state.actor.best_row = target_row;
        state.score += HOP_SCORE;
    }
}

/// Hazards run slower near the start row and approach full speed at the
/// home row, linear in row progress, with a fixed global factor on top
pub fn progressive_multiplier(actor_row: u32) -> f32 {
    let start_row = BOARD_ROWS - 1;
    let progress = (start_row - actor_row.min(start_row)) as f32 / start_row as f32;
    (PROGRESSIVE_MIN + (1.0 - PROGRESSIVE_MIN) * progress) * PROGRESSIVE_GLOBAL
}

fn advance_hazards(state: &mut GameState, dt_factor: f32, progressive: f32, elapsed_ms: f32) {
    let (lanes, rng) = (&mut state.lanes, &mut state.rng);
    for lane in lanes {
        let direction = lane.descriptor.direction;
        for hazard in &mut lane.hazards {
            hazard.x += hazard.speed * direction * progressive * dt_factor;
            if let Some(dive) = &mut hazard.dive {
                dive.advance(elapsed_ms, rng);
            }
        }
    }
}

/// Re-insert hazards that left the playfield (plus wrap buffer) at the
/// opposite edge, strictly behind the rearmost of the lane by at least the
/// lane's minimum spacing. Wraps are processed in original index order so
/// several in one frame land consecutively, never overlapping.
fn wrap_hazards(state: &mut GameState) {
    for lane in &mut state.lanes {
        wrap_lane(lane);
    }
}

fn wrap_lane(lane: &mut Lane) {
    let direction = lane.descriptor.direction;
    let min_gap = lane.min_gap;

    let wrapped: Vec<usize> = lane
        .hazards
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            if direction > 0.0 {
                h.x > BOARD_WIDTH + WRAP_BUFFER
            } else {
                h.x + h.width < -WRAP_BUFFER
            }
        })
        .map(|(i, _)| i)
        .collect();

    for i in wrapped {
        let width = lane.hazards[i].width;
        if direction > 0.0 {
            // Rearmost is the leftmost left edge among the others
            let rear = lane
                .hazards
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, h)| h.x)
                .fold(f32::INFINITY, f32::min);
            let entry = -WRAP_BUFFER - width;
            lane.hazards[i].x = if rear.is_finite() {
                (rear - min_gap - width).min(entry)
            } else {
                entry
            };
        } else {
            // Rearmost is the rightmost right edge among the others
            let rear = lane
                .hazards
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, h)| h.x + h.width)
                .fold(f32::NEG_INFINITY, f32::max);
            let entry = BOARD_WIDTH + WRAP_BUFFER;
            lane.hazards[i].x = if rear.is_finite() {
                (rear + min_gap).max(entry)
            } else {
                entry
            };
        }
    }
}

/// Road lanes only: hazards sorted front-to-back along the travel
/// direction; any hazard that crept inside the minimum gap of the one
/// ahead is pushed back to legal distance. Gap-exempt pairs may stay close.
fn enforce_road_gaps(state: &mut GameState) {
    for lane in &mut state.lanes {
        if lane.descriptor.lane_type != LaneType::Road || lane.hazards.len() < 2 {
            continue;
        }

        let direction = lane.descriptor.direction;
        let mut order: Vec<usize> = (0..lane.hazards.len()).collect();
        if direction > 0.0 {
            // Front of the pack has the largest x
            order.sort_by(|&a, &b| lane.hazards[b].x.total_cmp(&lane.hazards[a].x));
            for pair in order.windows(2) {
                let (ahead, behind) = (pair[0], pair[1]);
                let gap = required_gap(
                    lane.hazards[behind].kind,
                    lane.hazards[ahead].kind,
                    lane.min_gap,
                );
                let limit = lane.hazards[ahead].x - gap - lane.hazards[behind].width;
                if lane.hazards[behind].x > limit {
                    lane.hazards[behind].x = limit;
                }
            }
        } else {
            order.sort_by(|&a, &b| lane.hazards[a].x.total_cmp(&lane.hazards[b].x));
            for pair in order.windows(2) {
                let (ahead, behind) = (pair[0], pair[1]);
                let gap = required_gap(
                    lane.hazards[behind].kind,
                    lane.hazards[ahead].kind,
                    lane.min_gap,
                );
                let limit = lane.hazards[ahead].x + lane.hazards[ahead].width + gap;
                if lane.hazards[behind].x < limit {
                    lane.hazards[behind].x = limit;
                }
            }
        }
    }
}

/// Interpolate the actor toward its hop target; snap and clear the moving
/// flag once within one step
fn advance_actor(state: &mut GameState, dt_factor: f32) {
    if !state.actor.moving {
        return;
    }
    let step = HOP_STEP * dt_factor;
    let delta = state.actor.target - state.actor.pos;
    let dist = delta.length();
    if dist <= step {
        state.actor.pos = state.actor.target;
        state.actor.moving = false;
    } else {
        state.actor.pos += delta / dist * step;
    }
}

/// Classify a stationary actor's situation by its row's lane type
fn resolve_stationary(state: &mut GameState, dt_factor: f32, progressive: f32) {
    let row = state.actor.row();
    match state.board.lane_type(row) {
        LaneType::Water => resolve_water_support(state, row, dt_factor, progressive),
        LaneType::Road => resolve_road_collision(state, row),
        LaneType::Home => resolve_home_row(state),
        LaneType::Safe => resolve_power_up(state),
    }
}

/// Standing in water: alive only while overlapping a safe support, which
/// also carries the actor sideways
fn resolve_water_support(state: &mut GameState, row: u32, dt_factor: f32, progressive: f32) {
    let forgiving = state.level == 1;
    let (a_start, a_end) = state.actor.interval();

    // Copy the carry velocity out so the lane borrow ends before anything
    // is mutated
    let carry_velocity = match state.lanes.iter().find(|l| l.descriptor.row == row) {
        None => return,
        Some(lane) => lane
            .hazards
            .iter()
            .find(|h| {
                let (h_start, h_end) = h.interval();
                intervals_overlap(a_start, a_end, h_start, h_end) && h.is_safe_support(forgiving)
            })
            .map(|h| h.speed * lane.descriptor.direction),
    };

    match carry_velocity {
        None => kill(state, DeathCause::Splash),
        Some(velocity) => {
            // Carry runs a fixed fraction slower than the support itself
            let dx = velocity * progressive * dt_factor * CARRY_FACTOR;
            state.actor.pos.x += dx;
            state.actor.target.x = state.actor.pos.x;

            let half = ACTOR_SIZE / 2.0;
            if state.actor.pos.x < half || state.actor.pos.x > BOARD_WIDTH - half {
                kill(state, DeathCause::Splash);
            }
        }
    }
}

/// Standing in traffic: any overlap kills, with a small forgiving inset on
/// both the actor and the vehicle
fn resolve_road_collision(state: &mut GameState, row: u32) {
    let (a_start, a_end) = state.actor.interval();
    let (a_start, a_end) = (a_start + ROAD_COLLISION_INSET, a_end - ROAD_COLLISION_INSET);

    let Some(lane) = state.lanes.iter().find(|l| l.descriptor.row == row) else {
        return;
    };

    let hit = lane.hazards.iter().any(|h| {
        let (h_start, h_end) = h.interval();
        intervals_overlap(
            a_start,
            a_end,
            h_start + ROAD_COLLISION_INSET,
            h_end - ROAD_COLLISION_INSET,
        )
    });

    if hit {
        kill(state, DeathCause::Crash);
    }
}

/// On the home row: landing in an unfilled slot fills it; anything else is
/// water
fn resolve_home_row(state: &mut GameState) {
    let x = state.actor.pos.x;
    let slot = state
        .homes
        .iter()
        .position(|s| !s.filled && (s.x - x).abs() <= HOME_ALIGN_TOLERANCE);

    let Some(slot) = slot else {
        kill(state, DeathCause::Splash);
        return;
    };

    state.homes[slot].filled = true;
    state.score += HOME_SCORE;
    state.push_event(GameEvent::Victory);
    let start = state.board.start_position();
    state.actor.reset(start);
    state.roll_power_up();
    log::info!(
        "home slot {} filled ({}/{})",
        slot,
        state.homes.iter().filter(|s| s.filled).count(),
        HOME_SLOTS
    );

    if state.homes.iter().all(|s| s.filled) {
        complete_level(state);
    }
}

/// All slots filled: bonus, level up, slots reset, actor reset, lanes
/// regenerated for the new level
fn complete_level(state: &mut GameState) {
    state.score += ALL_HOMES_SCORE + state.level as u64 * LEVEL_BONUS_PER_LEVEL;
    state.level += 1;
    for slot in &mut state.homes {
        slot.filled = false;
    }
    let start = state.board.start_position();
    state.actor.reset(start);
    state.lanes = spawn::build_lanes(&state.board, state.level, &mut state.rng);
    state.roll_power_up();
    state.push_event(GameEvent::LevelUp);
    log::info!("level {} reached, score {}", state.level, state.score);
}

/// Collect a power-up the actor is standing near on the median strip
fn resolve_power_up(state: &mut GameState) {
    let Some(power_up) = &state.power_up else {
        return;
    };
    if power_up.collected || state.actor.pos.distance(power_up.pos) > PICKUP_RADIUS {
        return;
    }

    let kind = power_up.kind;
    if let Some(p) = &mut state.power_up {
        p.collected = true;
    }
    match kind {
        PowerUpKind::ExtraLife => {
            state.lives = (state.lives + 1).min(MAX_LIVES);
            log::info!("extra life collected, lives {}", state.lives);
        }
        PowerUpKind::Invincibility => {
            // A fresh pickup resets the window; it never stacks
            state.invincible_ms = INVINCIBILITY_MS;
            log::info!("invincibility collected");
        }
    }
}

/// Commit a death outcome. Suppressed while invincible, and while another
/// death is already animating.
fn kill(state: &mut GameState, cause: DeathCause) {
    if state.is_invincible() || state.phase == GamePhase::Dying {
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.push_event(match cause {
        DeathCause::Crash => GameEvent::Crash,
        DeathCause::Splash => GameEvent::Splash,
    });
    state.death_effect = Some(DeathEffect {
        cause,
        pos: state.actor.pos,
        timer_ms: DEATH_PAUSE_MS,
    });
    state.phase = GamePhase::Dying;
    log::info!("death by {:?}, lives left {}", cause, state.lives);
}

/// Run the death animation pause down; then respawn or end the run
fn advance_death(state: &mut GameState, elapsed_ms: f32) {
    let Some(effect) = &mut state.death_effect else {
        // Defensive: nothing animating, fall back to play
        state.phase = GamePhase::Playing;
        return;
    };

    effect.timer_ms -= elapsed_ms;
    if effect.timer_ms > 0.0 {
        return;
    }
    state.death_effect = None;

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.continue_window_ms = CONTINUE_WINDOW_MS;
        state.push_event(GameEvent::GameOver);
        log::info!("game over, final score {}", state.score);
    } else {
        let start = state.board.start_position();
        state.actor.reset(start);
        state.phase = GamePhase::Playing;
    }
}
