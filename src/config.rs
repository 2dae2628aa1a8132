//! Construction-time configuration for a maze session.
//!
//! Nothing in the generation, door, light or collision algorithms hardcodes these
//! values; every consumer receives them from a [`MazeConfig`]. The defaults match what
//! the scene builder and the debug view both expect, so two consumers that use
//! `MazeConfig::default()` always agree on door and light layout.

use crate::error::{MazeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Probability that a present wall segment carries a door.
pub const DEFAULT_DOOR_PROBABILITY: f64 = 0.10;

/// Probability that a cell gets a ceiling light.
pub const DEFAULT_LIGHT_PROBABILITY: f64 = 0.15;

/// Tunable parameters for one maze session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Number of cells along the x axis.
    pub width: usize,
    /// Number of cells along the z axis.
    pub height: usize,
    /// World units per cell edge.
    pub cell_size: f32,
    /// Height of wall geometry in world units.
    pub wall_height: f32,
    /// Chance in `[0, 1]` that a present wall becomes a door.
    pub door_probability: f64,
    /// Chance in `[0, 1]` that a cell gets a light.
    pub light_probability: f64,
    /// Clearance kept between the player and any wall (player radius).
    pub collision_buffer: f32,
    /// How close a door must be along the facing ray to trigger a transition.
    pub door_trigger_distance: f32,
    /// Walking speed in world units per second.
    pub player_speed: f32,
    /// Key turning rate in degrees per second.
    pub turn_rate: f32,
    /// Eye height of the camera above the floor.
    pub eye_height: f32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            cell_size: 4.0,
            wall_height: 3.0,
            door_probability: DEFAULT_DOOR_PROBABILITY,
            light_probability: DEFAULT_LIGHT_PROBABILITY,
            collision_buffer: 0.3,
            door_trigger_distance: 1.0,
            player_speed: 4.0,
            turn_rate: 90.0,
            eye_height: 1.6,
        }
    }
}

impl MazeConfig {
    /// Loads a config from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: MazeConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations no session can be built from.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MazeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.cell_size > 0.0) {
            return Err(invalid(format!("cell_size must be positive, got {}", self.cell_size)));
        }
        if !(self.wall_height > 0.0) {
            return Err(invalid(format!(
                "wall_height must be positive, got {}",
                self.wall_height
            )));
        }
        for (name, p) in [
            ("door_probability", self.door_probability),
            ("light_probability", self.light_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        if !(self.collision_buffer >= 0.0) || self.collision_buffer * 2.0 >= self.cell_size {
            return Err(invalid(format!(
                "collision_buffer must be in [0, cell_size / 2), got {}",
                self.collision_buffer
            )));
        }
        if !(self.door_trigger_distance >= 0.0) {
            return Err(invalid("door_trigger_distance must not be negative".to_string()));
        }
        if self.door_trigger_distance <= self.collision_buffer {
            return Err(invalid(format!(
                "door_trigger_distance ({}) must exceed collision_buffer ({}) or doors can never be reached",
                self.door_trigger_distance, self.collision_buffer
            )));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> MazeError {
    MazeError::InvalidConfig { reason }
}
