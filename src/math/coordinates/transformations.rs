//! Conversions between grid cells and world positions.

use crate::maze::generator::CellPos;

/// World-space centre of a cell on the XZ plane.
///
/// Cell `(cx, cz)` maps to `(cx * cell_size + cell_size / 2, cz * cell_size + cell_size / 2)`.
pub fn cell_center(cell: CellPos, cell_size: f32) -> (f32, f32) {
    (
        cell.x as f32 * cell_size + cell_size / 2.0,
        cell.z as f32 * cell_size + cell_size / 2.0,
    )
}

/// Converts a cell to a full world position at the given height.
pub fn maze_to_world(cell: CellPos, cell_size: f32, y_position: f32) -> [f32; 3] {
    let (x, z) = cell_center(cell, cell_size);
    [x, y_position, z]
}

/// Integer cell index along one axis, or `None` if the coordinate is below zero.
pub fn axis_to_index(coordinate: f32, cell_size: f32) -> Option<usize> {
    let index = (coordinate / cell_size).floor();
    // NaN fails both comparisons and is treated as outside the grid
    if index >= 0.0 && index < usize::MAX as f32 {
        Some(index as usize)
    } else {
        None
    }
}

/// Converts a world position to the grid cell containing it.
///
/// Returns `None` when the position lies outside `[0, width) × [0, height)`.
/// The y coordinate is ignored since the maze is flat.
pub fn world_to_maze(position: [f32; 3], cell_size: f32, dimensions: (usize, usize)) -> Option<CellPos> {
    let (width, height) = dimensions;
    let x = axis_to_index(position[0], cell_size)?;
    let z = axis_to_index(position[2], cell_size)?;
    (x < width && z < height).then_some(CellPos::new(x, z))
}

/// Offset of a coordinate inside its cell, in `[0, cell_size)`.
pub fn local_offset(coordinate: f32, index: usize, cell_size: f32) -> f32 {
    coordinate - index as f32 * cell_size
}
