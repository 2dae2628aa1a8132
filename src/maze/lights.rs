//! Ceiling light placement.
//!
//! Lights use their own stream, seeded with [`light_seed`] of the maze seed, so that
//! adding or removing lights never disturbs door placement. Every consumer (scene
//! builder, debug map) goes through this one derivation.

use crate::maze::generator::{CellPos, Grid};
use crate::maze::rng::SeededRng;
use log::debug;
use serde::{Deserialize, Serialize};

/// Offset added to the maze seed to seed the light stream.
pub const LIGHT_SEED_OFFSET: u32 = 1000;

/// Fraction of the wall height at which lights hang.
const LIGHT_HEIGHT_RATIO: f32 = 0.8;

/// The seed for the light stream of a maze.
pub fn light_seed(maze_seed: u32) -> u32 {
    maze_seed.wrapping_add(LIGHT_SEED_OFFSET)
}

/// A light hung in the middle of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightPlacement {
    pub cell: CellPos,
    /// World position `[x, y, z]`.
    pub position: [f32; 3],
}

/// Places lights: one draw per cell, x ascending then z ascending.
pub fn compute_lights(
    grid: &Grid,
    maze_seed: u32,
    probability: f64,
    cell_size: f32,
    wall_height: f32,
) -> Vec<LightPlacement> {
    let mut rng = SeededRng::new(light_seed(maze_seed));
    let (width, height) = grid.dimensions();
    let mut lights = Vec::new();

    for x in 0..width {
        for z in 0..height {
            if rng.next_f64() < probability {
                let cell = CellPos::new(x, z);
                let (wx, wz) = crate::math::coordinates::cell_center(cell, cell_size);
                lights.push(LightPlacement {
                    cell,
                    position: [wx, wall_height * LIGHT_HEIGHT_RATIO, wz],
                });
            }
        }
    }

    debug!("placed {} lights for seed {maze_seed}", lights.len());
    lights
}
