//! Coordinate system transformations for the maze.
//!
//! Two coordinate systems meet here:
//! - Grid coordinates: integer `(x, z)` cell positions used by generation and door placement
//! - World coordinates: continuous `[x, y, z]` positions where the player moves
//!
//! The grid origin sits at the world origin. Grid `x` grows east and grid `z` grows
//! south, so the north edge of a cell is its low-z edge and the west edge its low-x edge.

mod positions;
mod transformations;

pub use positions::*;
pub use transformations::*;
