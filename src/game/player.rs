//! Player state and locomotion logic.
//!
//! This module defines the [`Player`] struct, which tracks the player's position,
//! orientation and locomotion state, and the per-frame orientation update that drives
//! the [`Locomotion`] state machine.
//!
//! # Coordinate System
//!
//! - X-axis: east (+) / west (-)
//! - Y-axis: height
//! - Z-axis: south (+) / north (-)
//!
//! Angles are measured in degrees:
//! - **Pitch**: up/down look angle, clamped to [-89°, +89°]
//! - **Yaw**: compass heading in [0°, 360°), 0° north and 90° east
//!
//! # Locomotion
//!
//! ```text
//!            release_pointer (pitch off level)
//!   Idle/Moving/Turning ───────────────────────▶ Leveling
//!          ▲                                        │
//!          └────────── |pitch| < LEVEL_EPSILON ─────┘
//! ```
//!
//! While leveling, turn keys are ignored for that tick.

use crate::config::MazeConfig;
use crate::game::collision::MoveInput;
use crate::math::coordinates::{self, Direction, direction_to_yaw};
use crate::math::{wrap_degrees, yaw_to_forward, yaw_to_right};
use crate::maze::generator::CellPos;
use crate::maze::layout::MazeLayout;

/// Pitch limit in degrees, keeps the camera from flipping.
pub const PITCH_LIMIT: f32 = 89.0;

/// Rate at which pitch returns to level after pointer release, degrees per second.
pub const LEVEL_RATE: f32 = 90.0;

/// Pitch within this many degrees of level counts as level.
pub const LEVEL_EPSILON: f32 = 0.5;

/// What the player's body is doing this tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Locomotion {
    #[default]
    Idle,
    Moving,
    Turning,
    /// Pitch easing back to level after fine-aim control was released.
    Leveling,
}

/// Represents the player character's state in the world.
#[derive(Debug, Clone)]
pub struct Player {
    /// World position `[x, y, z]`, y being eye height.
    pub position: [f32; 3],
    /// Vertical look angle in degrees.
    pub pitch: f32,
    /// Compass heading in degrees.
    pub yaw: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Key turning rate in degrees per second.
    pub turn_rate: f32,
    /// Degrees of rotation per unit of mouse movement.
    pub mouse_sensitivity: f32,
    /// Whether mouse look is active (pointer captured).
    pub pointer_captured: bool,
    /// Current locomotion state.
    pub locomotion: Locomotion,
    /// The maze cell the player currently occupies, if inside the grid.
    pub current_cell: Option<CellPos>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Creates a player at the origin with default movement parameters.
    pub fn new() -> Self {
        Self::from_config(&MazeConfig::default())
    }

    /// Creates a player using the speed, turn rate and eye height from `config`.
    pub fn from_config(config: &MazeConfig) -> Self {
        Self {
            position: [0.0, config.eye_height, 0.0], // Will be set correctly when spawning
            pitch: 0.0,
            yaw: 0.0,
            speed: config.player_speed,
            turn_rate: config.turn_rate,
            mouse_sensitivity: 0.15,
            pointer_captured: false,
            locomotion: Locomotion::Idle,
            current_cell: None,
        }
    }

    /// Places the player at the layout's spawn cell, facing its first open side.
    pub fn spawn_at_start(&mut self, layout: &MazeLayout) {
        let start = layout.start_cell();
        self.position = coordinates::maze_to_world(start, layout.cell_size(), self.position[1]);
        self.current_cell = Some(start);
        self.pitch = 0.0;
        self.locomotion = Locomotion::Idle;

        let facing = Direction::WALL_ORDER
            .into_iter()
            .find(|&direction| !layout.grid().has_wall(start, direction))
            .unwrap_or(Direction::North);
        self.yaw = direction_to_yaw(facing);
    }

    /// Mouse look. Ignored unless the pointer is captured.
    ///
    /// Positive `delta_x` turns right, positive `delta_y` looks down.
    pub fn mouse_movement(&mut self, delta_x: f64, delta_y: f64) {
        if !self.pointer_captured {
            return;
        }
        self.yaw = wrap_degrees(self.yaw + delta_x as f32 * self.mouse_sensitivity);
        self.pitch = (self.pitch - delta_y as f32 * self.mouse_sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Enters mouse-look mode, cancelling any leveling in progress.
    pub fn capture_pointer(&mut self) {
        self.pointer_captured = true;
        if self.locomotion == Locomotion::Leveling {
            self.locomotion = Locomotion::Idle;
        }
    }

    /// Leaves mouse-look mode; the view starts leveling if it is tilted.
    pub fn release_pointer(&mut self) {
        self.pointer_captured = false;
        if self.pitch.abs() >= LEVEL_EPSILON {
            self.locomotion = Locomotion::Leveling;
        } else {
            self.pitch = 0.0;
        }
    }

    /// XZ displacement the input asks for this frame, before collision.
    ///
    /// Opposing keys cancel; diagonal input is normalised so it is no faster than
    /// straight movement.
    pub fn desired_delta(&self, input: MoveInput, delta_time: f32) -> [f32; 2] {
        let forward = yaw_to_forward(self.yaw);
        let right = yaw_to_right(self.yaw);
        let mut direction = [0.0f32, 0.0f32];

        let mut add = |v: [f32; 2], sign: f32| {
            direction[0] += v[0] * sign;
            direction[1] += v[1] * sign;
        };
        if input.forward {
            add(forward, 1.0);
        }
        if input.backward {
            add(forward, -1.0);
        }
        if input.right {
            add(right, 1.0);
        }
        if input.left {
            add(right, -1.0);
        }

        let length = (direction[0] * direction[0] + direction[1] * direction[1]).sqrt();
        if length <= 1e-6 {
            return [0.0, 0.0];
        }
        let distance = self.speed * delta_time / length;
        [direction[0] * distance, direction[1] * distance]
    }

    /// Advances the locomotion state machine by one tick.
    ///
    /// `turn` is -1 for turning left, +1 for right, 0 for none. Leveling takes priority
    /// over turning; once pitch is within [`LEVEL_EPSILON`] of level it snaps to zero
    /// and the player goes back to idle.
    pub fn update_orientation(&mut self, turn: f32, moving: bool, delta_time: f32) -> Locomotion {
        if self.locomotion == Locomotion::Leveling {
            let step = LEVEL_RATE * delta_time;
            if self.pitch.abs() <= step || self.pitch.abs() - step < LEVEL_EPSILON {
                self.pitch = 0.0;
                self.locomotion = Locomotion::Idle;
            } else {
                self.pitch -= step * self.pitch.signum();
            }
            return Locomotion::Leveling;
        }

        self.locomotion = if turn != 0.0 {
            self.yaw = wrap_degrees(self.yaw + turn.signum() * self.turn_rate * delta_time);
            Locomotion::Turning
        } else if moving {
            Locomotion::Moving
        } else {
            Locomotion::Idle
        };
        self.locomotion
    }

    /// Updates the player's current maze cell from their world position.
    pub fn update_cell(&mut self, cell_size: f32, dimensions: (usize, usize)) {
        self.current_cell = coordinates::world_to_maze(self.position, cell_size, dimensions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn forward_delta_follows_yaw() {
        let mut player = Player::new();
        player.speed = 2.0;
        player.yaw = 90.0;
        let delta = player.desired_delta(
            MoveInput {
                forward: true,
                ..MoveInput::default()
            },
            0.5,
        );
        assert!(close(delta[0], 1.0) && close(delta[1], 0.0), "{delta:?}");
    }

    #[test]
    fn diagonal_is_not_faster() {
        let player = Player::new();
        let delta = player.desired_delta(
            MoveInput {
                forward: true,
                right: true,
                ..MoveInput::default()
            },
            1.0,
        );
        let length = (delta[0] * delta[0] + delta[1] * delta[1]).sqrt();
        assert!(close(length, player.speed));
    }

    #[test]
    fn opposing_keys_cancel() {
        let player = Player::new();
        let delta = player.desired_delta(
            MoveInput {
                forward: true,
                backward: true,
                ..MoveInput::default()
            },
            1.0,
        );
        assert_eq!(delta, [0.0, 0.0]);
    }

    #[test]
    fn mouse_look_needs_capture() {
        let mut player = Player::new();
        player.mouse_movement(100.0, 100.0);
        assert_eq!((player.yaw, player.pitch), (0.0, 0.0));

        player.capture_pointer();
        player.mouse_movement(0.0, -10_000.0);
        assert_eq!(player.pitch, PITCH_LIMIT);
        player.mouse_movement(-100.0, 0.0);
        assert!(close(player.yaw, 345.0));
    }

    #[test]
    fn release_levels_pitch_then_idles() {
        let mut player = Player::new();
        player.capture_pointer();
        player.pitch = 30.0;
        player.release_pointer();
        assert_eq!(player.locomotion, Locomotion::Leveling);

        // Turning is suppressed while leveling
        let yaw = player.yaw;
        assert_eq!(player.update_orientation(1.0, false, 0.1), Locomotion::Leveling);
        assert_eq!(player.yaw, yaw);
        assert!(close(player.pitch, 21.0));

        for _ in 0..10 {
            player.update_orientation(0.0, false, 0.1);
        }
        assert_eq!(player.pitch, 0.0);
        assert_eq!(player.locomotion, Locomotion::Idle);

        assert_eq!(player.update_orientation(1.0, false, 0.1), Locomotion::Turning);
        assert!(close(player.yaw, 9.0));
    }

    #[test]
    fn negative_pitch_levels_upward() {
        let mut player = Player::new();
        player.pitch = -10.0;
        player.release_pointer();
        player.update_orientation(0.0, true, 0.05);
        assert!(close(player.pitch, -5.5));
    }

    #[test]
    fn level_pitch_does_not_enter_leveling() {
        let mut player = Player::new();
        player.pitch = 0.2;
        player.release_pointer();
        assert_eq!(player.locomotion, Locomotion::Idle);
        assert_eq!(player.pitch, 0.0);
        assert_eq!(player.update_orientation(0.0, true, 0.1), Locomotion::Moving);
    }

    #[test]
    fn capture_cancels_leveling() {
        let mut player = Player::new();
        player.pitch = 45.0;
        player.release_pointer();
        player.capture_pointer();
        assert_eq!(player.locomotion, Locomotion::Idle);
        assert_eq!(player.pitch, 45.0);
    }

    #[test]
    fn spawn_faces_an_open_side() {
        let layout = MazeLayout::build(&MazeConfig::default(), Some(42)).unwrap();
        let mut player = Player::new();
        player.spawn_at_start(&layout);
        let (x, z) = layout.start_position();
        assert_eq!((player.position[0], player.position[2]), (x, z));
        let facing = coordinates::yaw_to_direction(player.yaw);
        assert!(!layout.grid().has_wall(layout.start_cell(), facing));
    }
}
