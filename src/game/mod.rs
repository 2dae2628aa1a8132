//! Game state management module.
//!
//! This module defines the [`GameState`] struct, which tracks all mutable state for the
//! frame loop: the player, the collision system built from the shared maze layout, and
//! any door transition in flight.

pub mod collision;
pub mod keys;
pub mod player;

use self::collision::{CollisionSystem, DoorHit, MoveOutcome};
use self::keys::{GameKey, KeyState};
use self::player::{PITCH_LIMIT, Player};
use crate::config::MazeConfig;
use crate::error::Result;
use crate::math::coordinates;
use crate::math::wrap_degrees;
use crate::maze::generator::CellPos;
use crate::maze::layout::MazeLayout;
use crate::services::door_transition::DoorRequest;
use crate::services::persistence::{SessionSnapshot, Vec3};
use log::{debug, info, warn};
use std::sync::Arc;

/// Something that happened during a frame that the host should react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    /// The player walked into a door; movement is frozen until the transition ends.
    DoorCollision(DoorHit),
    /// The player entered a different cell.
    CellChanged(CellPos),
    /// The player asked for the map.
    PrintMaze,
    /// The player asked to quit.
    Quit,
}

/// Represents the entire mutable state of one maze session.
///
/// The [`MazeLayout`] is computed once and shared read-only; the renderer and the
/// debug console can hold their own handle to it.
#[derive(Debug)]
pub struct GameState {
    pub config: MazeConfig,
    layout: Arc<MazeLayout>,
    /// The player character.
    pub player: Player,
    /// Walls and doors the player collides with.
    pub collision_system: CollisionSystem,
    /// Number of frames updated since start.
    pub frame_count: u32,
    /// Door whose transition is in flight, if any.
    pending_door: Option<DoorHit>,
}

impl GameState {
    /// Builds the layout for `seed` (or a random one) and spawns the player at its start.
    pub fn new(config: MazeConfig, seed: Option<u32>) -> Result<Self> {
        let layout = Arc::new(MazeLayout::build(&config, seed)?);

        let mut collision_system = CollisionSystem::new(&config);
        collision_system.build_from_layout(&layout);

        let mut player = Player::from_config(&config);
        player.spawn_at_start(&layout);

        info!(
            "session started: seed {}, spawn cell ({}, {})",
            layout.seed(),
            layout.start_cell().x,
            layout.start_cell().z
        );

        Ok(Self {
            config,
            layout,
            player,
            collision_system,
            frame_count: 0,
            pending_door: None,
        })
    }

    /// Rebuilds the session a snapshot was taken from.
    ///
    /// The maze is regenerated from the stored seed. A stored position outside the grid
    /// is discarded and the player spawns at the start instead.
    pub fn resume(config: MazeConfig, snapshot: &SessionSnapshot) -> Result<Self> {
        let mut state = Self::new(config, Some(snapshot.seed))?;
        let position: [f32; 3] = snapshot.position.into();
        let dimensions = state.layout.grid().dimensions();

        match coordinates::world_to_maze(position, state.layout.cell_size(), dimensions) {
            Some(cell) => {
                state.player.position = position;
                state.player.current_cell = Some(cell);
                state.player.pitch = snapshot.rotation.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);
                state.player.yaw = wrap_degrees(snapshot.rotation.y);
                debug!("resumed in cell ({}, {})", cell.x, cell.z);
            }
            None => warn!(
                "saved position {position:?} is outside the {}x{} maze, respawning",
                dimensions.0, dimensions.1
            ),
        }
        Ok(state)
    }

    /// The shared, read-only layout.
    pub fn layout(&self) -> &Arc<MazeLayout> {
        &self.layout
    }

    pub fn seed(&self) -> u32 {
        self.layout.seed()
    }

    /// Seed, position and rotation for persistence.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            seed: self.layout.seed(),
            position: self.player.position.into(),
            rotation: Vec3 {
                x: self.player.pitch,
                y: self.player.yaw,
                z: 0.0,
            },
        }
    }

    /// One-shot actions for a key press. Held movement keys are read in [`GameState::update`].
    pub fn handle_key_press(&mut self, key: GameKey) -> Option<FrameEvent> {
        match key {
            GameKey::MouseButtonLeft => {
                self.player.capture_pointer();
                None
            }
            GameKey::Escape => {
                self.player.release_pointer();
                None
            }
            GameKey::PrintMaze => Some(FrameEvent::PrintMaze),
            GameKey::Quit => Some(FrameEvent::Quit),
            _ => None,
        }
    }

    /// Advances one frame: orientation, then movement, then cell tracking.
    ///
    /// Never blocks. While a door transition is pending the player stays put.
    pub fn update(&mut self, keys: &KeyState, delta_time: f32) -> Vec<FrameEvent> {
        let mut events = Vec::new();
        if self.pending_door.is_some() {
            return events;
        }
        self.frame_count += 1;

        let input = keys.move_input();
        self.player
            .update_orientation(keys.turn_axis(), input.is_moving(), delta_time);

        match self
            .player
            .move_with_collision(&self.collision_system, delta_time, input)
        {
            MoveOutcome::Door(hit) => {
                info!(
                    "door collision at cell ({}, {}) facing {:?}",
                    hit.door.cell.x, hit.door.cell.z, hit.door.direction
                );
                self.pending_door = Some(hit);
                events.push(FrameEvent::DoorCollision(hit));
            }
            MoveOutcome::Moved => {
                let previous = self.player.current_cell;
                self.player
                    .update_cell(self.layout.cell_size(), self.layout.grid().dimensions());
                if let Some(cell) = self.player.current_cell.filter(|&c| previous != Some(c)) {
                    events.push(FrameEvent::CellChanged(cell));
                }
            }
            MoveOutcome::Stationary => {}
        }
        events
    }

    /// The door whose transition is in flight.
    pub fn pending_door(&self) -> Option<&DoorHit> {
        self.pending_door.as_ref()
    }

    /// The request to send for the pending door, if there is one.
    pub fn door_request(&self, current_url: &str) -> Option<DoorRequest> {
        self.pending_door
            .as_ref()
            .map(|hit| DoorRequest::for_hit(current_url, self.layout.seed(), hit))
    }

    /// Ends the pending transition and lets the player move again.
    ///
    /// Called both after a successful redirect and after a failed one; the layout is
    /// unaffected either way.
    pub fn end_transition(&mut self) -> Option<DoorHit> {
        let hit = self.pending_door.take();
        if hit.is_some() {
            debug!("door transition ended");
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_forward(state: &mut GameState, frames: usize) -> Vec<FrameEvent> {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::MoveForward);
        let mut events = Vec::new();
        for _ in 0..frames {
            events.extend(state.update(&keys, 0.05));
        }
        events
    }

    #[test]
    fn new_session_spawns_at_layout_start() {
        let state = GameState::new(MazeConfig::default(), Some(42)).unwrap();
        let (x, z) = state.layout().start_position();
        assert_eq!((state.player.position[0], state.player.position[2]), (x, z));
        assert_eq!(state.player.current_cell, Some(state.layout().start_cell()));
        assert_eq!(state.seed(), 42);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MazeConfig {
            width: 0,
            ..MazeConfig::default()
        };
        assert!(GameState::new(config, Some(1)).is_err());
    }

    #[test]
    fn walking_stays_inside_the_maze() {
        let config = MazeConfig {
            door_probability: 0.0,
            ..MazeConfig::default()
        };
        let mut state = GameState::new(config, Some(7)).unwrap();
        walk_forward(&mut state, 400);
        let (width, height) = state.layout().grid().dimensions();
        let cs = state.layout().cell_size();
        let [x, _, z] = state.player.position;
        assert!(x > 0.0 && x < width as f32 * cs);
        assert!(z > 0.0 && z < height as f32 * cs);
        assert!(state.pending_door().is_none());
    }

    #[test]
    fn door_collision_freezes_movement_until_transition_ends() {
        let config = MazeConfig {
            door_probability: 1.0,
            ..MazeConfig::default()
        };
        let mut state = GameState::new(config, Some(42)).unwrap();
        let events = walk_forward(&mut state, 400);
        let hit = events
            .iter()
            .find_map(|event| match event {
                FrameEvent::DoorCollision(hit) => Some(*hit),
                _ => None,
            })
            .expect("every wall is a door, walking forward must reach one");

        assert_eq!(state.pending_door(), Some(&hit));
        let frozen = state.player.position;
        let frames = state.frame_count;
        assert!(walk_forward(&mut state, 10).is_empty());
        assert_eq!(state.player.position, frozen);
        assert_eq!(state.frame_count, frames);

        let request = state.door_request("https://example.org/maze").unwrap();
        assert_eq!(request.maze_seed, 42);
        assert_eq!(request.door_hash, hit.door.segment(state.layout().cell_size()).hash());

        assert_eq!(state.end_transition(), Some(hit));
        assert!(state.door_request("https://example.org/maze").is_none());
    }

    #[test]
    fn snapshot_and_resume_restore_the_player() {
        let mut state = GameState::new(MazeConfig::default(), Some(9)).unwrap();
        state.player.yaw = 135.0;
        state.player.pitch = -12.0;
        let snapshot = state.snapshot();
        assert_eq!(snapshot.rotation.z, 0.0);

        let resumed = GameState::resume(MazeConfig::default(), &snapshot).unwrap();
        assert_eq!(resumed.layout().grid(), state.layout().grid());
        assert_eq!(resumed.player.position, state.player.position);
        assert_eq!((resumed.player.yaw, resumed.player.pitch), (135.0, -12.0));
    }

    #[test]
    fn resume_outside_grid_respawns() {
        let state = GameState::new(MazeConfig::default(), Some(9)).unwrap();
        let mut snapshot = state.snapshot();
        snapshot.position = [-50.0, 1.6, 500.0].into();
        let resumed = GameState::resume(MazeConfig::default(), &snapshot).unwrap();
        assert_eq!(resumed.player.position, state.player.position);
    }

    #[test]
    fn key_presses_drive_pointer_and_commands() {
        let mut state = GameState::new(MazeConfig::default(), Some(1)).unwrap();
        assert_eq!(state.handle_key_press(GameKey::MouseButtonLeft), None);
        assert!(state.player.pointer_captured);
        assert_eq!(state.handle_key_press(GameKey::Escape), None);
        assert!(!state.player.pointer_captured);
        assert_eq!(state.handle_key_press(GameKey::PrintMaze), Some(FrameEvent::PrintMaze));
        assert_eq!(state.handle_key_press(GameKey::Quit), Some(FrameEvent::Quit));
    }
}
