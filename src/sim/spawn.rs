//! Lane object factory
//!
//! Builds each lane's hazard list for a level: spacing rules, coverage
//! across the visible width plus the wrap buffer, staggered offsets, and
//! per-kind speed scaling. The same gap rules are reused by the frame
//! loop's wrap-respawn and road ordering passes.

use rand::Rng;
use rand_pcg::Pcg32;

use super::board::{Board, HazardKind, LaneDescriptor, LaneType, level_speed_multiplier};
use super::dive::DiveState;
use super::state::{Hazard, Lane};
use crate::consts::*;

/// Road gap at level 2+ before per-level narrowing
pub const ROAD_GAP_BASE: f32 = 96.0;
/// Extra breathing room on the first level
pub const ROAD_GAP_LEVEL1_BONUS: f32 = 48.0;
/// Gap shrink per level past 2
pub const ROAD_GAP_SHRINK: f32 = 8.0;
/// Level-independent gap floor; spacing never collapses below this
pub const ROAD_GAP_FLOOR: f32 = 40.0;
/// Spacing between two gap-exempt hazards
pub const RACER_MIN_GAP: f32 = 20.0;
/// Tile-aligned minimum gap between water supports
pub const WATER_MIN_GAP: f32 = TILE_SIZE * 2.0;

/// Minimum gap ahead of a road hazard for this level
pub fn road_min_gap(level: u32) -> f32 {
    let gap = if level <= 1 {
        ROAD_GAP_BASE + ROAD_GAP_LEVEL1_BONUS
    } else {
        ROAD_GAP_BASE - (level - 2) as f32 * ROAD_GAP_SHRINK
    };
    gap.max(ROAD_GAP_FLOOR)
}

/// Gap required between a specific pair of neighbors. Two gap-exempt
/// hazards may sit closer than the lane minimum.
pub fn required_gap(behind: HazardKind, ahead: HazardKind, lane_min_gap: f32) -> f32 {
    if behind.is_gap_exempt() && ahead.is_gap_exempt() {
        RACER_MIN_GAP.min(lane_min_gap)
    } else {
        lane_min_gap
    }
}

/// Build all lanes for a level
pub fn build_lanes(board: &Board, level: u32, rng: &mut Pcg32) -> Vec<Lane> {
    let mut next_id = 1u32;
    board
        .lanes
        .iter()
        .map(|descriptor| build_lane(descriptor, level, &mut next_id, rng))
        .collect()
}

/// Build one lane's hazards per its descriptor and the current level
pub fn build_lane(
    descriptor: &LaneDescriptor,
    level: u32,
    next_id: &mut u32,
    rng: &mut Pcg32,
) -> Lane {
    let kind = match (descriptor.lane_type, descriptor.kind) {
        (LaneType::Road | LaneType::Water, Some(kind)) => kind,
        (LaneType::Road | LaneType::Water, None) => {
            // Malformed descriptor: the lane stays empty rather than erroring
            log::debug!("lane {} has no hazard kind, leaving empty", descriptor.row);
            return Lane {
                descriptor: *descriptor,
                min_gap: 0.0,
                hazards: Vec::new(),
            };
        }
        _ => {
            return Lane {
                descriptor: *descriptor,
                min_gap: 0.0,
                hazards: Vec::new(),
            };
        }
    };

    let min_gap = match descriptor.lane_type {
        LaneType::Road if kind.is_gap_exempt() => RACER_MIN_GAP,
        LaneType::Road => road_min_gap(level),
        _ => WATER_MIN_GAP,
    };

    let width = kind.width();
    let speed = descriptor.base_speed
        * level_speed_multiplier(level)
        * if descriptor.lane_type == LaneType::Road {
            kind.speed_factor()
        } else {
            1.0
        };

    // Cover the playfield plus the wrap buffer on both sides; widen the
    // count rather than squeeze the gap
    let span = BOARD_WIDTH + 2.0 * WRAP_BUFFER;
    let pitch = width + min_gap;
    let count = (span / pitch).ceil() as usize;

    // Stagger the whole train so same-kind lanes don't sync up
    let offset = rng.random_range(0.0..pitch);

    let hazards = (0..count)
        .map(|i| {
            let id = *next_id;
            *next_id += 1;
            Hazard {
                id,
                kind,
                x: -WRAP_BUFFER + offset + i as f32 * pitch,
                row: descriptor.row,
                width,
                speed,
                color_variant: rng.random_range(0..kind.color_variants()),
                dive: kind.is_submersible().then(|| DiveState::new(rng)),
            }
        })
        .collect();

    Lane {
        descriptor: *descriptor,
        min_gap,
        hazards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    /// Every consecutive pair must respect the pairwise required gap
    fn assert_lane_spacing(lane: &Lane) {
        let mut sorted: Vec<&Hazard> = lane.hazards.iter().collect();
        sorted.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
        for pair in sorted.windows(2) {
            let gap = pair[1].x - (pair[0].x + pair[0].width);
            let required = required_gap(pair[0].kind, pair[1].kind, lane.min_gap);
            assert!(
                gap >= required - 0.01,
                "lane {} gap {} below required {}",
                lane.descriptor.row,
                gap,
                required
            );
        }
    }

    #[test]
    fn test_no_overlap_at_spawn() {
        let board = Board::classic();
        for level in 1..=10 {
            let mut rng = Pcg32::seed_from_u64(level as u64 * 31);
            for lane in build_lanes(&board, level, &mut rng) {
                assert_lane_spacing(&lane);
            }
        }
    }

    #[test]
    fn test_coverage_spans_buffered_width() {
        let board = Board::classic();
        let mut rng = Pcg32::seed_from_u64(5);
        for lane in build_lanes(&board, 1, &mut rng) {
            if lane.hazards.is_empty() {
                continue;
            }
            let span = BOARD_WIDTH + 2.0 * WRAP_BUFFER;
            let pitch = lane.hazards[0].width + lane.min_gap;
            assert!(lane.hazards.len() as f32 * pitch >= span);
        }
    }

    #[test]
    fn test_gap_narrows_with_level_to_floor() {
        assert!(road_min_gap(1) > road_min_gap(2));
        assert!(road_min_gap(2) > road_min_gap(5));
        assert_eq!(road_min_gap(50), ROAD_GAP_FLOOR);
    }

    #[test]
    fn test_racer_pairs_pack_tighter() {
        let lane_gap = road_min_gap(3);
        assert!(
            required_gap(HazardKind::Racer, HazardKind::Racer, lane_gap) < lane_gap
        );
        assert_eq!(
            required_gap(HazardKind::Racer, HazardKind::Sedan, lane_gap),
            lane_gap
        );
    }

    #[test]
    fn test_safe_lanes_hold_no_hazards() {
        let board = Board::classic();
        let mut rng = Pcg32::seed_from_u64(1);
        for lane in build_lanes(&board, 1, &mut rng) {
            match lane.descriptor.lane_type {
                LaneType::Safe | LaneType::Home => assert!(lane.hazards.is_empty()),
                _ => assert!(!lane.hazards.is_empty()),
            }
        }
    }

    #[test]
    fn test_missing_kind_yields_empty_lane() {
        let descriptor = LaneDescriptor {
            row: 9,
            lane_type: LaneType::Road,
            base_speed: 1.0,
            direction: -1.0,
            kind: None,
        };
        let mut next_id = 1;
        let mut rng = Pcg32::seed_from_u64(1);
        let lane = build_lane(&descriptor, 1, &mut next_id, &mut rng);
        assert!(lane.hazards.is_empty());
    }

    #[test]
    fn test_dive_state_on_rafts_only() {
        let board = Board::classic();
        let mut rng = Pcg32::seed_from_u64(8);
        for lane in build_lanes(&board, 1, &mut rng) {
            for hazard in &lane.hazards {
                assert_eq!(hazard.dive.is_some(), hazard.kind.is_submersible());
            }
        }
    }

    #[test]
    fn test_road_speed_scales_with_kind_and_level() {
        let board = Board::classic();
        let mut rng = Pcg32::seed_from_u64(2);
        let l1 = build_lanes(&board, 1, &mut rng);
        let mut rng = Pcg32::seed_from_u64(2);
        let l4 = build_lanes(&board, 4, &mut rng);

        for (a, b) in l1.iter().zip(l4.iter()) {
            if let (Some(ha), Some(hb)) = (a.hazards.first(), b.hazards.first()) {
                assert!(hb.speed > ha.speed, "level scaling missing on row {}", ha.row);
            }
        }

        // Racers outrun sedans on equal lane base speed
        assert!(HazardKind::Racer.speed_factor() > HazardKind::Sedan.speed_factor());
    }

    #[test]
    fn test_ids_unique_across_lanes() {
        let board = Board::classic();
        let mut rng = Pcg32::seed_from_u64(3);
        let lanes = build_lanes(&board, 1, &mut rng);
        let mut ids: Vec<u32> = lanes
            .iter()
            .flat_map(|l| l.hazards.iter().map(|h| h.id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    proptest! {
        #[test]
        fn prop_spawn_never_overlaps(seed in any::<u64>(), level in 1u32..=20) {
            let board = Board::classic();
            let mut rng = Pcg32::seed_from_u64(seed);
            for lane in build_lanes(&board, level, &mut rng) {
                assert_lane_spacing(&lane);
            }
        }
    }
}
