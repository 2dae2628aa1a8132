//! Cardinal directions and cell adjacency.

use crate::maze::generator::CellPos;
use serde::{Deserialize, Serialize};

/// Cardinal direction of a cell boundary.
///
/// The declaration order (north, south, east, west) is the order walls are tested in
/// when placing doors, and `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Low-z edge, yaw 0°.
    North,
    /// High-z edge, yaw 180°.
    South,
    /// High-x edge, yaw 90°.
    East,
    /// Low-x edge, yaw 270°.
    West,
}

impl Direction {
    /// Wall test order used by door placement.
    pub const WALL_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Neighbour scan order used by the maze carver.
    pub const CARVE_ORDER: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];

    /// The direction facing back across the same boundary.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Grid step `(dx, dz)` taken when crossing this boundary.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Single-letter label used by the debug views.
    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::South => 'S',
            Direction::East => 'E',
            Direction::West => 'W',
        }
    }
}

/// Gets the cell adjacent to `cell` in `direction`, or `None` if it would leave the grid.
pub fn adjacent_cell(cell: CellPos, direction: Direction, dimensions: (usize, usize)) -> Option<CellPos> {
    let (width, height) = dimensions;
    let (dx, dz) = direction.offset();
    let x = cell.x.checked_add_signed(dx)?;
    let z = cell.z.checked_add_signed(dz)?;
    (x < width && z < height).then_some(CellPos::new(x, z))
}

/// Converts a yaw angle in degrees to the closest cardinal direction.
pub fn yaw_to_direction(yaw: f32) -> Direction {
    let normalized_yaw = crate::math::wrap_degrees(yaw);

    match normalized_yaw as u32 {
        315..=359 | 0..=44 => Direction::North,
        45..=134 => Direction::East,
        135..=224 => Direction::South,
        _ => Direction::West,
    }
}

/// Translates a direction into a yaw angle in degrees.
pub fn direction_to_yaw(direction: Direction) -> f32 {
    match direction {
        Direction::North => 0.0,
        Direction::East => 90.0,
        Direction::South => 180.0,
        Direction::West => 270.0,
    }
}
