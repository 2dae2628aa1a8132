//! Mazewalk - a deterministic first-person maze.
//!
//! A seeded generator carves a perfect maze, places doors and lights from the same seed,
//! and a per-axis collision system keeps the player inside it. Walking into a door hands
//! off to an external transition service.
//!
//! # Architecture
//! - `maze/`: seeded random stream, generator, doors, lights and the shared layout
//! - `game/`: player, collision, keyboard input and the per-frame game state
//! - `math/`: angle helpers and grid/world coordinate conversions
//! - `services/`: door transitions, session persistence and the debug console

pub mod config;
pub mod error;
pub mod game;
pub mod math;
pub mod maze;
pub mod services;
