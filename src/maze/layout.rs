//! Read-only maze layout shared by every consumer of a session.
//!
//! A [`MazeLayout`] is built once per session: generation, spawn selection, door and
//! light placement all run here, in that order, and their results are stored together.
//! The scene builder, the debug console and the collision system all read from the
//! same layout instead of replaying random streams on their own.

use crate::config::MazeConfig;
use crate::error::Result;
use crate::maze::doors::{DoorSegment, DoorSet, compute_doors};
use crate::maze::generator::{CellPos, Grid, MazeGenerator};
use crate::maze::lights::{LightPlacement, compute_lights};
use crate::math::coordinates::cell_center;
use log::info;

/// Everything derived from a seed and a config.
#[derive(Debug, Clone)]
pub struct MazeLayout {
    seed: u32,
    grid: Grid,
    cell_size: f32,
    wall_height: f32,
    start_cell: CellPos,
    doors: DoorSet,
    door_segments: Vec<DoorSegment>,
    lights: Vec<LightPlacement>,
}

impl MazeLayout {
    /// Generates the maze and all derived data.
    ///
    /// # Errors
    /// Any error from [`MazeConfig::validate`].
    pub fn build(config: &MazeConfig, seed: Option<u32>) -> Result<Self> {
        config.validate()?;
        let mut generator = MazeGenerator::new(config.width, config.height, seed)?;
        generator.generate();
        let start_cell = generator.start_cell();
        let seed = generator.seed();
        let grid = generator.into_grid();

        let doors = compute_doors(&grid, seed, config.door_probability);
        let door_segments = doors.segments(config.cell_size);
        let lights = compute_lights(
            &grid,
            seed,
            config.light_probability,
            config.cell_size,
            config.wall_height,
        );

        info!(
            "built {}x{} maze for seed {seed}: start {:?}, {} doors, {} lights",
            config.width,
            config.height,
            start_cell,
            doors.len(),
            lights.len()
        );

        Ok(Self {
            seed,
            grid,
            cell_size: config.cell_size,
            wall_height: config.wall_height,
            start_cell,
            doors,
            door_segments,
            lights,
        })
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn wall_height(&self) -> f32 {
        self.wall_height
    }

    pub fn start_cell(&self) -> CellPos {
        self.start_cell
    }

    /// World `(x, z)` at the centre of the spawn cell.
    pub fn start_position(&self) -> (f32, f32) {
        cell_center(self.start_cell, self.cell_size)
    }

    pub fn doors(&self) -> &DoorSet {
        &self.doors
    }

    /// Doors placed in world space, in placement order.
    pub fn door_segments(&self) -> &[DoorSegment] {
        &self.door_segments
    }

    pub fn lights(&self) -> &[LightPlacement] {
        &self.lights
    }
}
