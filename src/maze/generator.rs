//! Maze generation using an iterative recursive backtracker.
//!
//! This module provides the cell grid and a seeded generator that carves a perfect maze
//! (a spanning tree over all cells) either in one call or one carve at a time for
//! animated generation.
//!
//! # Examples
//!
//! ```rust
//! use mazewalk::maze::generator::MazeGenerator;
//!
//! // Create a 10x10 maze generator with a fixed seed
//! let mut generator = MazeGenerator::new(10, 10, Some(42)).unwrap();
//!
//! // Generate the maze step by step
//! while !generator.is_complete() {
//!     generator.step();
//! }
//!
//! assert_eq!(generator.grid().removed_wall_count(), 99);
//! ```
use crate::error::{MazeError, Result};
use crate::maze::rng::SeededRng;
use crate::math::coordinates::{Direction, adjacent_cell, cell_center};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Integer position of a cell in the grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPos {
    /// Column index, growing east.
    pub x: usize,
    /// Row index, growing south.
    pub z: usize,
}

impl CellPos {
    /// Creates a new position from grid coordinates.
    pub fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }
}

/// Presence flags for the four boundaries of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Default for Walls {
    /// All four walls present.
    fn default() -> Self {
        Self {
            north: true,
            south: true,
            east: true,
            west: true,
        }
    }
}

impl Walls {
    /// Whether the wall on the given side is present.
    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    fn set(&mut self, direction: Direction, present: bool) {
        match direction {
            Direction::North => self.north = present,
            Direction::South => self.south = present,
            Direction::East => self.east = present,
            Direction::West => self.west = present,
        }
    }

    /// Number of walls present, 0 to 4.
    pub fn count(&self) -> usize {
        Direction::WALL_ORDER
            .iter()
            .filter(|&&direction| self.has(direction))
            .count()
    }
}

/// A single grid cell with its boundary walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub pos: CellPos,
    pub walls: Walls,
}

/// Fixed-size grid of cells.
///
/// Wall removal goes through [`Grid::open_wall`], which always updates both cells sharing
/// the boundary, so the grid never holds a one-sided opening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every wall present.
    ///
    /// A zero-area grid is allowed here; [`MazeGenerator::new`] is where dimensions are
    /// validated.
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for z in 0..height {
            for x in 0..width {
                cells.push(Cell {
                    pos: CellPos::new(x, z),
                    walls: Walls::default(),
                });
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)` in cells.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, pos: CellPos) -> Option<usize> {
        (pos.x < self.width && pos.z < self.height).then(|| pos.z * self.width + pos.x)
    }

    /// Returns the cell at `pos`, or `None` outside the grid.
    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    /// Whether the wall on `direction` of `pos` is present. Cells outside the grid are
    /// treated as solid.
    pub fn has_wall(&self, pos: CellPos, direction: Direction) -> bool {
        self.cell(pos)
            .map(|cell| cell.walls.has(direction))
            .unwrap_or(true)
    }

    /// Iterates cells row by row (z outer, x inner).
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Removes the wall between `pos` and its neighbour in `direction` on both sides.
    ///
    /// Returns `false` when the neighbour is outside the grid or the wall was already open.
    pub(crate) fn open_wall(&mut self, pos: CellPos, direction: Direction) -> bool {
        let Some(neighbour) = adjacent_cell(pos, direction, self.dimensions()) else {
            return false;
        };
        let (Some(a), Some(b)) = (self.index(pos), self.index(neighbour)) else {
            return false;
        };
        if !self.cells[a].walls.has(direction) {
            return false;
        }
        self.cells[a].walls.set(direction, false);
        self.cells[b].walls.set(direction.opposite(), false);
        true
    }

    /// Number of internal boundaries that are open, each shared boundary counted once.
    pub fn removed_wall_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                let east = cell.pos.x + 1 < self.width && !cell.walls.east;
                let south = cell.pos.z + 1 < self.height && !cell.walls.south;
                east as usize + south as usize
            })
            .sum()
    }

    /// Number of cells reachable from `(0, 0)` through open walls.
    pub fn reachable_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([CellPos::new(0, 0)]);
        seen[0] = true;
        let mut count = 0;

        while let Some(pos) = queue.pop_front() {
            count += 1;
            for direction in Direction::WALL_ORDER {
                if self.has_wall(pos, direction) {
                    continue;
                }
                if let Some(next) = adjacent_cell(pos, direction, self.dimensions()) {
                    if let Some(i) = self.index(next) {
                        if !seen[i] {
                            seen[i] = true;
                            queue.push_back(next);
                        }
                    }
                }
            }
        }
        count
    }

    /// Whether every pair of neighbouring cells agrees on their shared wall.
    pub fn walls_symmetric(&self) -> bool {
        self.cells.iter().all(|cell| {
            [Direction::East, Direction::South].into_iter().all(|direction| {
                match adjacent_cell(cell.pos, direction, self.dimensions()) {
                    Some(neighbour) => {
                        cell.walls.has(direction) == self.has_wall(neighbour, direction.opposite())
                    }
                    None => true,
                }
            })
        })
    }
}

/// Seeded maze generator using the recursive backtracker with an explicit stack.
pub struct MazeGenerator {
    seed: u32,
    rng: SeededRng,
    grid: Grid,
    visited: Vec<bool>,
    stack: Vec<CellPos>,
    current: CellPos,
    carved: usize,
    start: Option<CellPos>,
    /// Indicates if generation is complete
    generation_complete: bool,
}

impl MazeGenerator {
    /// Creates a generator for a `width × height` maze.
    ///
    /// When `seed` is `None` one is drawn from the thread RNG; either way it is kept as
    /// the maze's identity and exposed through [`MazeGenerator::seed`].
    ///
    /// # Errors
    /// [`MazeError::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: usize, height: usize, seed: Option<u32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        let seed = seed.unwrap_or_else(rand::random);
        let grid = Grid::new(width, height);
        let mut visited = vec![false; width * height];
        visited[0] = true;

        debug!("maze generator {width}x{height} seeded with {seed}");

        Ok(Self {
            seed,
            rng: SeededRng::new(seed),
            grid,
            visited,
            stack: Vec::new(),
            current: CellPos::new(0, 0),
            carved: 0,
            start: None,
            generation_complete: false,
        })
    }

    /// The seed identifying this maze.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The grid in its current state of generation.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Consumes the generator and returns the grid.
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    fn is_visited(&self, pos: CellPos) -> bool {
        self.visited[pos.z * self.grid.width + pos.x]
    }

    /// Performs one step of the backtracker.
    ///
    /// Returns true if a wall was removed in this step. A step that finds no unvisited
    /// neighbour backtracks one cell instead.
    pub fn step(&mut self) -> bool {
        if self.generation_complete {
            return false;
        }

        let dimensions = self.grid.dimensions();
        let candidates: Vec<(Direction, CellPos)> = Direction::CARVE_ORDER
            .iter()
            .filter_map(|&direction| {
                adjacent_cell(self.current, direction, dimensions).map(|next| (direction, next))
            })
            .filter(|&(_, next)| !self.is_visited(next))
            .collect();

        if candidates.is_empty() {
            match self.stack.pop() {
                Some(previous) => self.current = previous,
                None => {
                    self.generation_complete = true;
                    info!(
                        "maze generation complete: seed {}, {} walls removed",
                        self.seed, self.carved
                    );
                }
            }
            return false;
        }

        let (direction, next) = candidates[self.rng.next_index(candidates.len())];
        self.grid.open_wall(self.current, direction);
        self.stack.push(self.current);
        self.current = next;
        self.visited[next.z * self.grid.width + next.x] = true;
        self.carved += 1;
        true
    }

    /// Runs the backtracker to completion and returns the finished grid.
    pub fn generate(&mut self) -> &Grid {
        while !self.generation_complete {
            self.step();
        }
        &self.grid
    }

    /// Checks if maze generation is complete
    pub fn is_complete(&self) -> bool {
        self.generation_complete
    }

    /// Returns the generation progress as a ratio (0.0 to 1.0)
    pub fn progress_ratio(&self) -> f32 {
        let total = self.grid.width * self.grid.height - 1;
        if total == 0 {
            1.0
        } else {
            self.carved as f32 / total as f32
        }
    }

    /// Picks the spawn cell: one of the most open interior cells.
    ///
    /// Finishes generation first if needed. Ties are broken with the generation stream's
    /// continuation, so the result depends on generation having consumed the stream.
    /// Mazes without interior cells fall back to cell `(1, 1)` clamped to the grid.
    /// The choice is made once; later calls return the same cell.
    pub fn start_cell(&mut self) -> CellPos {
        if let Some(start) = self.start {
            return start;
        }
        self.generate();
        let (width, height) = self.grid.dimensions();

        let mut best_walls = usize::MAX;
        let mut candidates = Vec::new();
        for x in 1..width.saturating_sub(1) {
            for z in 1..height.saturating_sub(1) {
                let pos = CellPos::new(x, z);
                let walls = self.grid.cell(pos).map_or(4, |cell| cell.walls.count());
                if walls < best_walls {
                    best_walls = walls;
                    candidates.clear();
                }
                if walls == best_walls {
                    candidates.push(pos);
                }
            }
        }

        let start = if candidates.is_empty() {
            CellPos::new(1.min(width - 1), 1.min(height - 1))
        } else {
            candidates[self.rng.next_index(candidates.len())]
        };
        self.start = Some(start);
        start
    }

    /// World-space `(x, z)` of the spawn cell's centre. See [`MazeGenerator::start_cell`].
    pub fn start_position(&mut self, cell_size: f32) -> (f32, f32) {
        cell_center(self.start_cell(), cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(width: usize, height: usize, seed: u32) -> MazeGenerator {
        let mut generator = MazeGenerator::new(width, height, Some(seed)).unwrap();
        generator.generate();
        generator
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            MazeGenerator::new(0, 5, Some(1)),
            Err(MazeError::InvalidDimensions { width: 0, height: 5 })
        ));
        assert!(MazeGenerator::new(5, 0, None).is_err());
    }

    #[test]
    fn fresh_grid_has_all_walls() {
        let generator = MazeGenerator::new(3, 4, Some(1)).unwrap();
        assert!(generator.grid().cells().all(|cell| cell.walls.count() == 4));
        assert_eq!(generator.grid().removed_wall_count(), 0);
        assert_eq!(generator.progress_ratio(), 0.0);
    }

    #[test]
    fn unseeded_generator_records_its_seed() {
        let a = MazeGenerator::new(4, 4, None).unwrap();
        let mut b = MazeGenerator::new(4, 4, Some(a.seed())).unwrap();
        let mut a = a;
        assert_eq!(a.generate(), b.generate());
    }

    #[test]
    fn seed_42_five_by_five() {
        let mut generator = generated(5, 5, 42);
        assert!(generator.is_complete());
        assert_eq!(generator.grid().removed_wall_count(), 24);
        assert_eq!(generator.grid().reachable_count(), 25);
        assert!(generator.grid().walls_symmetric());

        let start = generator.start_cell();
        assert!((1..4).contains(&start.x) && (1..4).contains(&start.z), "{start:?}");

        assert_eq!(generator.start_cell(), start);

        let mut again = generated(5, 5, 42);
        assert_eq!(again.start_position(4.0), cell_center(start, 4.0));
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generated(12, 7, 2024);
        let b = generated(12, 7, 2024);
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = generated(12, 12, 1);
        let b = generated(12, 12, 2);
        assert_ne!(a.grid(), b.grid());
    }

    #[test]
    fn single_cell_and_corridors() {
        let mut single = generated(1, 1, 5);
        assert!(single.is_complete());
        assert_eq!(single.grid().removed_wall_count(), 0);
        assert_eq!(single.start_cell(), CellPos::new(0, 0));

        let corridor = generated(6, 1, 5);
        assert_eq!(corridor.grid().removed_wall_count(), 5);
        assert_eq!(corridor.grid().reachable_count(), 6);
    }

    #[test]
    fn degenerate_maze_falls_back_to_fixed_cell() {
        let mut generator = generated(2, 2, 9);
        assert_eq!(generator.start_cell(), CellPos::new(1, 1));
    }

    #[test]
    fn start_cell_is_in_most_open_tier() {
        let mut generator = generated(9, 9, 77);
        let start = generator.start_cell();
        let grid = generator.grid();
        let start_walls = grid.cell(start).unwrap().walls.count();
        let fewest = grid
            .cells()
            .filter(|cell| (1..8).contains(&cell.pos.x) && (1..8).contains(&cell.pos.z))
            .map(|cell| cell.walls.count())
            .min()
            .unwrap();
        assert_eq!(start_walls, fewest);
    }

    #[test]
    fn step_reports_progress() {
        let mut generator = MazeGenerator::new(4, 4, Some(3)).unwrap();
        let mut carves = 0;
        while !generator.is_complete() {
            if generator.step() {
                carves += 1;
            }
        }
        assert_eq!(carves, 15);
        assert_eq!(generator.progress_ratio(), 1.0);
        assert!(!generator.step());
    }

    #[test]
    fn open_wall_is_symmetric_and_bounded() {
        let mut grid = Grid::new(2, 2);
        assert!(grid.open_wall(CellPos::new(0, 0), Direction::East));
        assert!(!grid.has_wall(CellPos::new(1, 0), Direction::West));
        assert!(!grid.open_wall(CellPos::new(1, 0), Direction::West));
        assert!(!grid.open_wall(CellPos::new(0, 0), Direction::North));
        assert!(grid.walls_symmetric());
        assert_eq!(grid.removed_wall_count(), 1);
    }
}
