//! Deterministic door placement.
//!
//! Door placement consumes one draw per present wall, in a fixed order over the whole
//! grid, from a stream freshly seeded with the maze seed. Any skipped or reordered draw
//! shifts every later decision, so [`compute_doors`] is the only place that walks the
//! grid for doors. Consumers read the resulting [`DoorSet`] from
//! [`crate::maze::layout::MazeLayout`] rather than re-running the draws.

use crate::math::coordinates::Direction;
use crate::maze::generator::{CellPos, Grid};
use crate::maze::rng::SeededRng;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A door-bearing wall segment: one side of one cell.
///
/// Ordering follows the placement walk (x, then z, then north/south/east/west).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DoorDescriptor {
    pub cell: CellPos,
    pub direction: Direction,
}

impl DoorDescriptor {
    pub fn new(cell: CellPos, direction: Direction) -> Self {
        Self { cell, direction }
    }

    /// World-space wall segment the door occupies on the XZ plane.
    pub fn segment(&self, cell_size: f32) -> DoorSegment {
        let x0 = self.cell.x as f32 * cell_size;
        let z0 = self.cell.z as f32 * cell_size;
        let x1 = x0 + cell_size;
        let z1 = z0 + cell_size;
        let (start, end) = match self.direction {
            Direction::North => ([x0, z0], [x1, z0]),
            Direction::South => ([x0, z1], [x1, z1]),
            Direction::East => ([x1, z0], [x1, z1]),
            Direction::West => ([x0, z0], [x0, z1]),
        };
        DoorSegment {
            door: *self,
            start,
            end,
        }
    }
}

/// A door placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorSegment {
    pub door: DoorDescriptor,
    /// One end of the wall segment, `[x, z]`.
    pub start: [f32; 2],
    /// The other end of the wall segment, `[x, z]`.
    pub end: [f32; 2],
}

impl DoorSegment {
    /// Midpoint of the segment, `[x, z]`.
    pub fn center(&self) -> [f32; 2] {
        [
            (self.start[0] + self.end[0]) * 0.5,
            (self.start[1] + self.end[1]) * 0.5,
        ]
    }

    /// Identifier sent to the door service, derived from the door's world position.
    pub fn hash(&self) -> String {
        door_hash(self.center())
    }
}

/// FNV-1a 64-bit hash of a world position, rendered as 16 hex digits.
///
/// Coordinates are formatted to three decimals first so the two cells sharing a wall
/// hash their door to the same value.
pub fn door_hash(position: [f32; 2]) -> String {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let key = format!("{:.3},{:.3}", position[0], position[1]);
    let hash = key.bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(PRIME)
    });
    format!("{hash:016x}")
}

/// Ordered set of door-bearing walls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSet {
    doors: BTreeSet<DoorDescriptor>,
}

impl DoorSet {
    pub fn contains(&self, cell: CellPos, direction: Direction) -> bool {
        self.doors.contains(&DoorDescriptor::new(cell, direction))
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    /// Doors in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &DoorDescriptor> {
        self.doors.iter()
    }

    /// World-space segments for every door.
    pub fn segments(&self, cell_size: f32) -> Vec<DoorSegment> {
        self.doors.iter().map(|door| door.segment(cell_size)).collect()
    }
}

impl FromIterator<DoorDescriptor> for DoorSet {
    fn from_iter<I: IntoIterator<Item = DoorDescriptor>>(iter: I) -> Self {
        Self {
            doors: iter.into_iter().collect(),
        }
    }
}

/// Decides which walls carry doors.
///
/// Builds a fresh stream from `seed`, then walks x ascending (outer) and z ascending
/// (inner). Inside each cell the walls are tested north, south, east, west; every
/// present wall costs exactly one draw and becomes a door when the draw is below
/// `probability`. A wall shared by two cells is tested from both sides.
pub fn compute_doors(grid: &Grid, seed: u32, probability: f64) -> DoorSet {
    let mut rng = SeededRng::new(seed);
    let mut doors = BTreeSet::new();
    let (width, height) = grid.dimensions();

    for x in 0..width {
        for z in 0..height {
            let pos = CellPos::new(x, z);
            let Some(cell) = grid.cell(pos) else {
                continue;
            };
            for direction in Direction::WALL_ORDER {
                if cell.walls.has(direction) && rng.next_f64() < probability {
                    doors.insert(DoorDescriptor::new(pos, direction));
                }
            }
        }
    }

    debug!("placed {} doors for seed {seed}", doors.len());
    DoorSet { doors }
}
