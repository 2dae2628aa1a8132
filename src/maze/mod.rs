//! Maze generation, derived layout data, and the ASCII map format.
//!
//! This module provides the seeded generator, door and light placement, the shared
//! [`layout::MazeLayout`], and utilities for writing a layout as a text map and
//! reading a grid back from one.
//!
//! # Map format
//!
//! A `width × height` maze becomes `2 * height + 1` lines of `2 * width + 1` characters.
//! Cell `(x, z)` sits at line `2z + 1`, column `2x + 1`; the characters between cells
//! are their shared walls.
//!
//! - `#` wall or corner
//! - `D` door-bearing wall
//! - `*` spawn cell
//! - `L` cell with a ceiling light
//! - ` ` open passage or plain cell
//!
//! ```text
//! #########
//! # #  *  #
//! # # ### #
//! #   #L  #
//! ###D#####
//! ```

pub mod doors;
pub mod generator;
pub mod layout;
pub mod lights;
pub mod rng;

use self::generator::{CellPos, Grid};
use self::layout::MazeLayout;
use crate::error::{MazeError, Result};
use crate::math::coordinates::Direction;
use std::path::Path;

/// Character grid position `(line, column)` of a cell's wall in the map.
fn wall_char_position(cell: CellPos, direction: Direction) -> (usize, usize) {
    let (row, col) = (2 * cell.z + 1, 2 * cell.x + 1);
    match direction {
        Direction::North => (row - 1, col),
        Direction::South => (row + 1, col),
        Direction::East => (row, col + 1),
        Direction::West => (row, col - 1),
    }
}

fn grid_chars(grid: &Grid) -> Vec<Vec<char>> {
    let (width, height) = grid.dimensions();
    let mut chars = vec![vec!['#'; 2 * width + 1]; 2 * height + 1];

    for cell in grid.cells() {
        let (row, col) = (2 * cell.pos.z + 1, 2 * cell.pos.x + 1);
        chars[row][col] = ' ';
        for direction in Direction::WALL_ORDER {
            if !cell.walls.has(direction) {
                let (r, c) = wall_char_position(cell.pos, direction);
                chars[r][c] = ' ';
            }
        }
    }
    chars
}

fn join_lines(chars: Vec<Vec<char>>) -> String {
    chars
        .into_iter()
        .map(|line| line.into_iter().collect::<String>() + "\n")
        .collect()
}

/// Renders only the walls of a grid.
pub fn render_grid_ascii(grid: &Grid) -> String {
    join_lines(grid_chars(grid))
}

/// Renders a layout with its doors, lights and spawn cell.
pub fn render_ascii(layout: &MazeLayout) -> String {
    let mut chars = grid_chars(layout.grid());

    for light in layout.lights() {
        chars[2 * light.cell.z + 1][2 * light.cell.x + 1] = 'L';
    }
    for door in layout.doors().iter() {
        let (row, col) = wall_char_position(door.cell, door.direction);
        chars[row][col] = 'D';
    }
    let start = layout.start_cell();
    chars[2 * start.z + 1][2 * start.x + 1] = '*';

    join_lines(chars)
}

/// Reads the walls of a map back into a grid.
///
/// Doors count as walls and cell markers are ignored. The outer border is always solid
/// regardless of what the map shows.
///
/// # Errors
/// [`MazeError::Parse`] if the map is not a `(2w+1) × (2h+1)` rectangle with `w, h ≥ 1`
/// or contains characters outside the map alphabet.
pub fn parse_ascii(text: &str) -> Result<Grid> {
    let lines: Vec<Vec<char>> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().collect())
        .collect();

    if lines.len() < 3 || lines.len() % 2 == 0 {
        return Err(MazeError::Parse {
            line: lines.len(),
            reason: format!("expected an odd number (>= 3) of lines, got {}", lines.len()),
        });
    }
    let line_width = lines[0].len();
    if line_width < 3 || line_width % 2 == 0 {
        return Err(MazeError::Parse {
            line: 1,
            reason: format!("expected an odd line width (>= 3), got {line_width}"),
        });
    }
    if let Some((index, line)) = lines
        .iter()
        .enumerate()
        .find(|(_, line)| line.len() != line_width)
    {
        return Err(MazeError::Parse {
            line: index + 1,
            reason: format!("line has {} characters, expected {line_width}", line.len()),
        });
    }

    let width = line_width / 2;
    let height = lines.len() / 2;
    let mut grid = Grid::new(width, height);

    for (row, line) in lines.iter().enumerate() {
        for (col, &c) in line.iter().enumerate() {
            let open = match c {
                '#' | 'D' => false,
                ' ' | '*' | 'L' => true,
                other => {
                    return Err(MazeError::Parse {
                        line: row + 1,
                        reason: format!("unexpected character {other:?} at column {}", col + 1),
                    });
                }
            };
            if !open {
                continue;
            }
            // Vertical walls sit on odd lines at even columns, horizontal ones the reverse
            let boundary = match (row % 2, col % 2) {
                (1, 0) if col > 0 && col < line_width - 1 => {
                    Some((CellPos::new(col / 2, row / 2), Direction::West))
                }
                (0, 1) if row > 0 && row < lines.len() - 1 => {
                    Some((CellPos::new(col / 2, row / 2), Direction::North))
                }
                _ => None,
            };
            if let Some((cell, direction)) = boundary {
                grid.open_wall(cell, direction);
            }
        }
    }

    Ok(grid)
}

/// Parses a maze map file. See [`parse_ascii`].
pub fn parse_maze_file(path: impl AsRef<Path>) -> Result<Grid> {
    let text = std::fs::read_to_string(path)?;
    parse_ascii(&text)
}
