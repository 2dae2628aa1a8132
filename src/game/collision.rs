//! Grid-based collision detection and door detection for player movement.
//!
//! # Overview
//!
//! The maze is a grid of cells whose walls sit exactly on cell boundaries, so collision
//! never needs general geometry. A proposed move is split into its X and Z components
//! and each axis is tested and committed on its own. Moving diagonally into a wall
//! therefore slides along it: the blocked axis is dropped, the free one is kept.
//!
//! # Axis test
//!
//! For one axis the candidate position is mapped to a cell by floor division. The axis
//! is rejected when:
//! 1. the candidate lies outside the grid
//! 2. the move crosses a cell boundary whose wall is present
//! 3. the candidate ends within `buffer` of a present wall on the side it is moving
//!    towards (the buffer is the player's radius)
//!
//! # Doors
//!
//! Door segments come from the session's [`MazeLayout`]. Before a move is committed a
//! ray is cast along the player's facing direction. The ray ends at the first present
//! wall; if that wall is a door closer than the trigger distance the move is abandoned
//! and the door is reported to the caller instead.

use crate::config::MazeConfig;
use crate::game::player::Player;
use crate::math::coordinates::{
    Direction, adjacent_cell, axis_to_index, local_offset, world_to_maze,
};
use crate::math::yaw_to_forward;
use crate::maze::doors::{DoorDescriptor, DoorSegment};
use crate::maze::generator::{CellPos, Grid};
use crate::maze::layout::MazeLayout;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Z,
}

impl Axis {
    fn component(self, position: [f32; 3]) -> f32 {
        match self {
            Axis::X => position[0],
            Axis::Z => position[2],
        }
    }

    /// Wall faced when moving along this axis in the given sign.
    fn approach(self, positive: bool) -> Direction {
        match (self, positive) {
            (Axis::X, true) => Direction::East,
            (Axis::X, false) => Direction::West,
            (Axis::Z, true) => Direction::South,
            (Axis::Z, false) => Direction::North,
        }
    }

    fn cell_index(self, cell: CellPos) -> usize {
        match self {
            Axis::X => cell.x,
            Axis::Z => cell.z,
        }
    }

    fn with_index(self, cell: CellPos, index: usize) -> CellPos {
        match self {
            Axis::X => CellPos::new(index, cell.z),
            Axis::Z => CellPos::new(cell.x, index),
        }
    }
}

fn axis_allowed(
    grid: &Grid,
    cell_size: f32,
    buffer: f32,
    from: [f32; 3],
    candidate: [f32; 3],
    axis: Axis,
) -> bool {
    let step = axis.component(candidate) - axis.component(from);
    let Some(target) = world_to_maze(candidate, cell_size, grid.dimensions()) else {
        return false;
    };
    if step == 0.0 {
        return true;
    }
    let approach = axis.approach(step > 0.0);

    // Every boundary crossed on the way to the target cell must be open
    if let Some(origin) = world_to_maze(from, cell_size, grid.dimensions()) {
        let mut index = axis.cell_index(origin);
        let end = axis.cell_index(target);
        while index != end {
            if grid.has_wall(axis.with_index(origin, index), approach) {
                return false;
            }
            index = if step > 0.0 { index + 1 } else { index - 1 };
        }
    }

    if !grid.has_wall(target, approach) {
        return true;
    }
    let coordinate = axis.component(candidate);
    let Some(index) = axis_to_index(coordinate, cell_size) else {
        return false;
    };
    let local = local_offset(coordinate, index, cell_size);
    if step > 0.0 {
        local <= cell_size - buffer
    } else {
        local >= buffer
    }
}

/// Resolves a proposed XZ movement against the maze walls.
///
/// The X component is tested and committed first, then the Z component from the
/// updated position. Each axis independently either moves fully or not at all, so the
/// result is always a valid position inside the grid when `current` was. The y
/// coordinate is never changed.
pub fn resolve_move(
    grid: &Grid,
    cell_size: f32,
    buffer: f32,
    current: [f32; 3],
    delta: [f32; 2],
) -> [f32; 3] {
    let mut position = current;

    let candidate = [position[0] + delta[0], position[1], position[2]];
    if axis_allowed(grid, cell_size, buffer, position, candidate, Axis::X) {
        position = candidate;
    }

    let candidate = [position[0], position[1], position[2] + delta[1]];
    if axis_allowed(grid, cell_size, buffer, position, candidate, Axis::Z) {
        position = candidate;
    }

    position
}

/// A door found along the player's facing ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorHit {
    pub door: DoorDescriptor,
    /// Distance from the ray origin to the door, in world units.
    pub distance: f32,
    /// World `[x, z]` of the door's midpoint.
    pub center: [f32; 2],
}

/// Slack when matching a door segment against the wall the ray stopped at.
const WALL_TOLERANCE: f32 = 1e-4;

fn cross(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[0] * b[1] - a[1] * b[0]
}

/// Distance along a unit ray from a point inside cell `cell` to the first present wall
/// it crosses, or `None` when no wall lies within `max_distance`.
///
/// Walks cell boundaries in the order the ray meets them.
fn first_wall_distance(
    grid: &Grid,
    cell_size: f32,
    mut cell: CellPos,
    origin: [f32; 2],
    dir: [f32; 2],
    max_distance: f32,
) -> Option<f32> {
    // Per axis: distance to the next boundary, distance between boundaries, wall crossed
    let setup = |o: f32, d: f32, index: usize, positive: Direction, negative: Direction| {
        if d > 0.0 {
            let boundary = (index + 1) as f32 * cell_size;
            ((boundary - o) / d, cell_size / d, positive)
        } else if d < 0.0 {
            let boundary = index as f32 * cell_size;
            ((boundary - o) / d, -cell_size / d, negative)
        } else {
            (f32::INFINITY, f32::INFINITY, positive)
        }
    };
    let (mut next_x, step_x, wall_x) =
        setup(origin[0], dir[0], cell.x, Direction::East, Direction::West);
    let (mut next_z, step_z, wall_z) =
        setup(origin[1], dir[1], cell.z, Direction::South, Direction::North);

    loop {
        let (t, wall) = if next_x <= next_z {
            (next_x, wall_x)
        } else {
            (next_z, wall_z)
        };
        if t > max_distance {
            return None;
        }
        if grid.has_wall(cell, wall) {
            return Some(t);
        }
        cell = adjacent_cell(cell, wall, grid.dimensions())?;
        if wall == wall_x {
            next_x += step_x;
        } else {
            next_z += step_z;
        }
    }
}

/// Casts a ray on the XZ plane and returns the nearest door within `max_distance`.
///
/// The ray stops at the first present wall it crosses: a door only counts when it sits
/// on that wall, so doors behind solid walls are never reported. A ray starting outside
/// the grid sees nothing. `direction` need not be normalised; distances are reported in
/// world units either way.
pub fn door_hit(
    grid: &Grid,
    cell_size: f32,
    doors: &[DoorSegment],
    origin: [f32; 2],
    direction: [f32; 2],
    max_distance: f32,
) -> Option<DoorHit> {
    let length = (direction[0] * direction[0] + direction[1] * direction[1]).sqrt();
    if length <= f32::EPSILON {
        return None;
    }
    let dir = [direction[0] / length, direction[1] / length];
    let cell = world_to_maze([origin[0], 0.0, origin[1]], cell_size, grid.dimensions())?;
    let wall_distance = first_wall_distance(grid, cell_size, cell, origin, dir, max_distance)?;
    let reach = wall_distance + WALL_TOLERANCE;

    let mut nearest: Option<DoorHit> = None;
    for segment in doors {
        let span = [
            segment.end[0] - segment.start[0],
            segment.end[1] - segment.start[1],
        ];
        let denom = cross(dir, span);
        if denom.abs() <= f32::EPSILON {
            continue; // parallel
        }
        let to_start = [segment.start[0] - origin[0], segment.start[1] - origin[1]];
        let t = cross(to_start, span) / denom;
        let u = cross(to_start, dir) / denom;
        if t < 0.0 || t > reach || !(0.0..=1.0).contains(&u) {
            continue;
        }
        if nearest.is_none_or(|hit| t < hit.distance) {
            nearest = Some(DoorHit {
                door: segment.door,
                distance: t,
                center: segment.center(),
            });
        }
    }
    nearest
}

/// Collision state for one session: the grid, its doors, and the clearance settings.
#[derive(Debug, Clone)]
pub struct CollisionSystem {
    grid: Grid,
    doors: Vec<DoorSegment>,
    cell_size: f32,
    /// Clearance kept from walls (player radius).
    pub buffer: f32,
    /// Facing-ray distance at which a door triggers.
    pub door_trigger_distance: f32,
}

impl CollisionSystem {
    /// Creates an empty system with the clearance settings from `config`.
    ///
    /// Until [`CollisionSystem::build_from_layout`] is called the grid has no cells and
    /// every move is rejected.
    pub fn new(config: &MazeConfig) -> Self {
        Self {
            grid: Grid::new(0, 0),
            doors: Vec::new(),
            cell_size: config.cell_size,
            buffer: config.collision_buffer,
            door_trigger_distance: config.door_trigger_distance,
        }
    }

    /// Loads the walls and doors of a layout.
    pub fn build_from_layout(&mut self, layout: &MazeLayout) {
        self.grid = layout.grid().clone();
        self.doors = layout.door_segments().to_vec();
        self.cell_size = layout.cell_size();
        debug!(
            "collision system loaded {}x{} grid with {} doors",
            self.grid.width(),
            self.grid.height(),
            self.doors.len()
        );
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// See [`resolve_move`].
    pub fn resolve(&self, current: [f32; 3], delta: [f32; 2]) -> [f32; 3] {
        resolve_move(&self.grid, self.cell_size, self.buffer, current, delta)
    }

    /// Nearest door along `direction` within the trigger distance.
    pub fn door_ahead(&self, position: [f32; 3], direction: [f32; 2]) -> Option<DoorHit> {
        door_hit(
            &self.grid,
            self.cell_size,
            &self.doors,
            [position[0], position[2]],
            direction,
            self.door_trigger_distance,
        )
    }
}

/// Directional movement requested for one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MoveInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveInput {
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Result of one movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No movement was requested or every axis was blocked.
    Stationary,
    /// The player moved to a new position.
    Moved,
    /// A door was ahead; the move was abandoned.
    Door(DoorHit),
}

// Integration with Player struct
impl Player {
    /// Moves the player for one frame, respecting walls and doors.
    ///
    /// 1. Builds the desired XZ delta from the input and the player's yaw
    /// 2. Casts the facing ray; a door within the trigger distance abandons the move
    /// 3. Otherwise resolves the delta per axis and commits the result
    pub fn move_with_collision(
        &mut self,
        collision_system: &CollisionSystem,
        delta_time: f32,
        input: MoveInput,
    ) -> MoveOutcome {
        let delta = self.desired_delta(input, delta_time);
        if delta == [0.0, 0.0] {
            return MoveOutcome::Stationary;
        }

        if let Some(hit) = collision_system.door_ahead(self.position, yaw_to_forward(self.yaw)) {
            debug!("door {:?} ahead at {:.2}", hit.door, hit.distance);
            return MoveOutcome::Door(hit);
        }

        let resolved = collision_system.resolve(self.position, delta);
        if resolved == self.position {
            MoveOutcome::Stationary
        } else {
            self.position = resolved;
            MoveOutcome::Moved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::doors::DoorDescriptor;

    /// 5x5 grid whose cell (2, 2) has north and east walls only.
    fn scenario_grid() -> Grid {
        let mut grid = Grid::new(5, 5);
        let center = CellPos::new(2, 2);
        grid.open_wall(center, Direction::South);
        grid.open_wall(center, Direction::West);
        grid
    }

    fn open_grid(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height);
        for x in 0..width {
            for z in 0..height {
                grid.open_wall(CellPos::new(x, z), Direction::East);
                grid.open_wall(CellPos::new(x, z), Direction::South);
            }
        }
        grid
    }

    #[test]
    fn north_wall_blocks_z_but_not_x() {
        let grid = scenario_grid();
        // Local offset (2.0, 0.1) in cell (2, 2) with 4-unit cells
        let start = [10.0, 1.6, 8.1];

        let blocked = resolve_move(&grid, 4.0, 0.3, start, [0.0, -0.5]);
        assert_eq!(blocked, start);

        let slid = resolve_move(&grid, 4.0, 0.3, start, [0.5, -0.5]);
        assert_eq!(slid, [10.5, 1.6, 8.1]);
    }

    #[test]
    fn buffer_rejects_approach_without_crossing() {
        let grid = scenario_grid();
        let start = [10.0, 0.0, 9.0];
        // Ends at local z 0.2, inside the 0.3 buffer of the north wall
        assert_eq!(resolve_move(&grid, 4.0, 0.3, start, [0.0, -0.8]), start);
        // Ends at local z 0.5, clear of the buffer
        assert_eq!(
            resolve_move(&grid, 4.0, 0.3, start, [0.0, -0.5]),
            [10.0, 0.0, 8.5]
        );
        // East wall: local x must stay at or below 3.7
        assert_eq!(resolve_move(&grid, 4.0, 0.3, start, [1.8, 0.0]), start);
        assert_eq!(
            resolve_move(&grid, 4.0, 0.3, start, [1.5, 0.0]),
            [11.5, 0.0, 9.0]
        );
    }

    #[test]
    fn open_sides_let_the_player_through() {
        let grid = scenario_grid();
        let start = [10.0, 0.0, 10.0];
        // West is open into cell (1, 2); south is open into cell (2, 3)
        assert_eq!(
            resolve_move(&grid, 4.0, 0.3, start, [-2.5, 0.0]),
            [7.5, 0.0, 10.0]
        );
        assert_eq!(
            resolve_move(&grid, 4.0, 0.3, start, [0.0, 2.5]),
            [10.0, 0.0, 12.5]
        );
    }

    #[test]
    fn large_steps_cannot_tunnel_through_walls() {
        let grid = scenario_grid();
        let start = [10.0, 0.0, 10.0];
        // Cell (2, 2) east wall is closed; cells beyond are irrelevant
        assert_eq!(resolve_move(&grid, 4.0, 0.3, start, [6.0, 0.0]), start);
    }

    #[test]
    fn movement_never_leaves_the_grid() {
        let grid = open_grid(3, 3);
        let corner = [0.5, 0.0, 0.5];
        assert_eq!(resolve_move(&grid, 4.0, 0.3, corner, [-1.0, -1.0]), corner);
        let far = [11.5, 0.0, 11.5];
        assert_eq!(resolve_move(&grid, 4.0, 0.3, far, [1.0, 1.0]), far);
        assert_eq!(resolve_move(&grid, 4.0, 0.0, far, [0.6, 0.0]), far);
    }

    #[test]
    fn door_ray_finds_nearest_door_in_front() {
        let doors = vec![
            DoorDescriptor::new(CellPos::new(0, 0), Direction::North).segment(4.0),
            DoorDescriptor::new(CellPos::new(0, 1), Direction::North).segment(4.0),
        ];
        let grid = Grid::new(1, 2);
        // Standing in cell (0, 1) facing north
        let hit = door_hit(&grid, 4.0, &doors, [2.0, 4.5], [0.0, -1.0], 1.0).unwrap();
        assert_eq!(hit.door.cell, CellPos::new(0, 1));
        assert!((hit.distance - 0.5).abs() < 1e-5);
        assert_eq!(hit.center, [2.0, 4.0]);

        assert!(door_hit(&grid, 4.0, &doors, [2.0, 4.5], [0.0, 1.0], 1.0).is_none());
        assert!(door_hit(&grid, 4.0, &doors, [2.0, 6.0], [0.0, -1.0], 1.0).is_none());
        assert!(door_hit(&grid, 4.0, &doors, [2.0, 4.5], [0.0, 0.0], 1.0).is_none());
        assert!(door_hit(&grid, 4.0, &doors, [-1.0, 4.5], [1.0, 0.0], 1.0).is_none());
    }

    #[test]
    fn door_ray_stops_at_solid_walls() {
        let doors = vec![DoorDescriptor::new(CellPos::new(0, 1), Direction::North).segment(4.0)];
        // Near the north-west corner of cell (1, 1), looking past the corner at the
        // door on the north side of cell (0, 1)
        let origin = [4.35, 4.35];
        let direction = [-1.0, -0.6];

        let closed = Grid::new(2, 2);
        assert!(door_hit(&closed, 4.0, &doors, origin, direction, 1.0).is_none());

        // With the west wall of (1, 1) open the same door is in plain sight
        let mut open = Grid::new(2, 2);
        open.open_wall(CellPos::new(1, 1), Direction::West);
        let hit = door_hit(&open, 4.0, &doors, origin, direction, 1.0).unwrap();
        assert_eq!(hit.door, doors[0].door);
        assert!((hit.distance - 0.35 * (1.36f32).sqrt() / 0.6).abs() < 1e-3);
    }

    #[test]
    fn door_ahead_abandons_the_move() {
        let config = MazeConfig::default();
        let layout = MazeLayout::build(
            &MazeConfig {
                door_probability: 1.0,
                ..config.clone()
            },
            Some(7),
        )
        .unwrap();
        let mut system = CollisionSystem::new(&config);
        system.build_from_layout(&layout);

        let mut player = Player::new();
        // Cell (0, 0), 0.5 units from its north wall, facing north
        player.position = [2.0, 1.6, 0.5];
        player.yaw = 0.0;
        let before = player.position;
        let outcome = player.move_with_collision(
            &system,
            0.1,
            MoveInput {
                forward: true,
                ..MoveInput::default()
            },
        );
        assert!(matches!(outcome, MoveOutcome::Door(hit) if hit.door.direction == Direction::North));
        assert_eq!(player.position, before);
    }

    #[test]
    fn empty_system_rejects_everything() {
        let system = CollisionSystem::new(&MazeConfig::default());
        assert_eq!(system.resolve([1.0, 0.0, 1.0], [0.5, 0.5]), [1.0, 0.0, 1.0]);
    }
}
