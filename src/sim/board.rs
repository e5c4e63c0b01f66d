//! Static board configuration
//!
//! Lane descriptors, hazard kind table, and level geometry. Immutable for a
//! run except that lanes regenerate their hazard lists on level transitions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::row_y;

/// What a row of the board is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneType {
    /// Goal row with the five home slots
    Home,
    /// River row; hazards here are supports, the water itself kills
    Water,
    /// No hazards (start row and the median strip)
    Safe,
    /// Traffic row; hazards here kill on contact
    Road,
}

/// Moving object kinds, road and water
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Sedan,
    Coupe,
    Truck,
    Bulldozer,
    /// Fast and small; exempt from the full road gap requirement
    Racer,
    LogShort,
    LogMedium,
    LogLong,
    /// Submersible platform, cycles through dive phases
    TurtleRaft,
}

impl HazardKind {
    /// Horizontal extent in pixels
    pub fn width(&self) -> f32 {
        match self {
            HazardKind::Sedan | HazardKind::Coupe => 32.0,
            HazardKind::Truck => 64.0,
            HazardKind::Bulldozer => 40.0,
            HazardKind::Racer => 28.0,
            HazardKind::LogShort => 64.0,
            HazardKind::LogMedium => 96.0,
            HazardKind::LogLong => 128.0,
            HazardKind::TurtleRaft => 96.0,
        }
    }

    /// Per-kind speed factor for road hazards (smaller kinds run hotter)
    pub fn speed_factor(&self) -> f32 {
        match self {
            HazardKind::Racer => 1.8,
            HazardKind::Coupe => 1.2,
            HazardKind::Sedan => 1.0,
            HazardKind::Truck => 0.9,
            HazardKind::Bulldozer => 0.8,
            _ => 1.0,
        }
    }

    /// Racers may pack closer than the lane's minimum gap
    pub fn is_gap_exempt(&self) -> bool {
        matches!(self, HazardKind::Racer)
    }

    pub fn is_support(&self) -> bool {
        matches!(
            self,
            HazardKind::LogShort
                | HazardKind::LogMedium
                | HazardKind::LogLong
                | HazardKind::TurtleRaft
        )
    }

    pub fn is_submersible(&self) -> bool {
        matches!(self, HazardKind::TurtleRaft)
    }

    /// Number of sprite color variants for this kind (render concern, but
    /// the variant is rolled at spawn so it lives in the sim state)
    pub fn color_variants(&self) -> u8 {
        match self {
            HazardKind::Sedan | HazardKind::Coupe => 4,
            HazardKind::Racer => 2,
            _ => 1,
        }
    }
}

/// One row's hazard-generation policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LaneDescriptor {
    pub row: u32,
    pub lane_type: LaneType,
    /// Base speed in px per reference frame
    pub base_speed: f32,
    /// +1.0 rightward, -1.0 leftward
    pub direction: f32,
    /// Hazard kind for this lane; `None` on a hazard-bearing type means the
    /// lane simply stays empty
    pub kind: Option<HazardKind>,
}

/// The level board: ordered lane descriptors plus derived geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub lanes: Vec<LaneDescriptor>,
}

impl Board {
    /// The classic 13-row layout: home, five water lanes, median, five road
    /// lanes, start
    pub fn classic() -> Self {
        use HazardKind::*;
        use LaneType::*;

        let lane = |row, lane_type, base_speed, direction, kind| LaneDescriptor {
            row,
            lane_type,
            base_speed,
            direction,
            kind,
        };

        Self {
            lanes: vec![
                lane(0, Home, 0.0, 1.0, None),
                lane(1, Water, 1.2, 1.0, Some(LogMedium)),
                lane(2, Water, 1.0, -1.0, Some(TurtleRaft)),
                lane(3, Water, 1.6, 1.0, Some(LogLong)),
                lane(4, Water, 0.9, 1.0, Some(LogShort)),
                lane(5, Water, 1.1, -1.0, Some(TurtleRaft)),
                lane(6, Safe, 0.0, 1.0, None),
                lane(7, Road, 1.0, -1.0, Some(Truck)),
                lane(8, Road, 2.2, 1.0, Some(Racer)),
                lane(9, Road, 1.2, -1.0, Some(Sedan)),
                lane(10, Road, 0.9, 1.0, Some(Bulldozer)),
                lane(11, Road, 1.4, -1.0, Some(Coupe)),
                lane(12, Safe, 0.0, 1.0, None),
            ],
        }
    }

    pub fn descriptor(&self, row: u32) -> Option<&LaneDescriptor> {
        self.lanes.iter().find(|l| l.row == row)
    }

    pub fn lane_type(&self, row: u32) -> LaneType {
        self.descriptor(row)
            .map(|l| l.lane_type)
            .unwrap_or(LaneType::Safe)
    }

    /// The actor's spawn point: center of the start row's middle tile
    pub fn start_position(&self) -> Vec2 {
        let start_row = BOARD_ROWS - 1;
        Vec2::new(
            (BOARD_COLS / 2) as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            row_y(start_row) + TILE_SIZE / 2.0,
        )
    }

    /// X centers of the five home slots, evenly spaced across the top row
    pub fn home_slot_centers(&self) -> [f32; HOME_SLOTS] {
        let pitch = BOARD_WIDTH / HOME_SLOTS as f32;
        std::array::from_fn(|i| (i as f32 + 0.5) * pitch)
    }
}

/// Global hazard speed multiplier for a level (1-based)
pub fn level_speed_multiplier(level: u32) -> f32 {
    (1.0 + 0.1 * level.saturating_sub(1) as f32).min(2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_row_map() {
        let board = Board::classic();
        assert_eq!(board.lanes.len(), BOARD_ROWS as usize);
        assert_eq!(board.lane_type(0), LaneType::Home);
        for row in 1..=5 {
            assert_eq!(board.lane_type(row), LaneType::Water);
        }
        assert_eq!(board.lane_type(6), LaneType::Safe);
        for row in 7..=11 {
            assert_eq!(board.lane_type(row), LaneType::Road);
        }
        assert_eq!(board.lane_type(12), LaneType::Safe);
    }

    #[test]
    fn test_start_position_on_start_row() {
        let board = Board::classic();
        let start = board.start_position();
        assert_eq!(start.y, row_y(BOARD_ROWS - 1) + TILE_SIZE / 2.0);
        assert!(start.x > 0.0 && start.x < BOARD_WIDTH);
    }

    #[test]
    fn test_home_slots_spread_and_ordered() {
        let board = Board::classic();
        let centers = board.home_slot_centers();
        for pair in centers.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(centers[0] > 0.0);
        assert!(centers[HOME_SLOTS - 1] < BOARD_WIDTH);
    }

    #[test]
    fn test_level_multiplier_monotonic_and_capped() {
        assert_eq!(level_speed_multiplier(1), 1.0);
        assert!(level_speed_multiplier(2) > level_speed_multiplier(1));
        assert_eq!(level_speed_multiplier(99), 2.0);
    }

    #[test]
    fn test_unknown_row_is_safe() {
        let board = Board::classic();
        assert_eq!(board.lane_type(42), LaneType::Safe);
    }
}
