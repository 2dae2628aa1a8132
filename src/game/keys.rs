//! Keyboard and mouse input handling for the game.
//!
//! This module defines the [`GameKey`] enum for abstracting game actions from physical keys,
//! and provides [`KeyState`] for tracking pressed keys and turning them into per-frame
//! movement and turning input. It also maps winit key events to game actions.

use crate::game::collision::MoveInput;
use std::collections::HashSet;
use winit::keyboard;

/// Enum representing all in-game actions that can be triggered by keyboard or mouse input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Left mouse button (captures the pointer for mouse look).
    MouseButtonLeft,
    /// Move player forward (W or Up Arrow).
    MoveForward,
    /// Move player backward (S or Down Arrow).
    MoveBackward,
    /// Strafe left (A).
    MoveLeft,
    /// Strafe right (D).
    MoveRight,
    /// Turn left in place (Q or Left Arrow).
    TurnLeft,
    /// Turn right in place (E or Right Arrow).
    TurnRight,
    /// Escape key (releases the pointer).
    Escape,
    /// Print the maze map to the log (M).
    PrintMaze,
    /// Quit the game (`).
    Quit,
}

/// Tracks the set of currently pressed game keys.
#[derive(Debug, Default)]
pub struct KeyState {
    /// Set of currently pressed keys.
    pub pressed_keys: HashSet<GameKey>,
}

impl KeyState {
    /// Creates a new, empty [`KeyState`]
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
        }
    }

    /// Marks a key as pressed.
    pub fn press_key(&mut self, key: GameKey) {
        self.pressed_keys.insert(key);
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn clear(&mut self) {
        self.pressed_keys.clear();
    }

    /// Movement keys held this frame.
    pub fn move_input(&self) -> MoveInput {
        MoveInput {
            forward: self.is_pressed(GameKey::MoveForward),
            backward: self.is_pressed(GameKey::MoveBackward),
            left: self.is_pressed(GameKey::MoveLeft),
            right: self.is_pressed(GameKey::MoveRight),
        }
    }

    /// -1 for turning left, +1 for right, 0 when neither or both are held.
    pub fn turn_axis(&self) -> f32 {
        let left = self.is_pressed(GameKey::TurnLeft) as i8;
        let right = self.is_pressed(GameKey::TurnRight) as i8;
        (right - left) as f32
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`GameKey`] if it matches a mapped action.
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::MoveForward,
            ArrowDown => GameKey::MoveBackward,
            ArrowLeft => GameKey::TurnLeft,
            ArrowRight => GameKey::TurnRight,
            Escape => GameKey::Escape,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::MoveForward,
            "s" => GameKey::MoveBackward,
            "a" => GameKey::MoveLeft,
            "d" => GameKey::MoveRight,
            "q" => GameKey::TurnLeft,
            "e" => GameKey::TurnRight,
            "m" => GameKey::PrintMaze,
            "`" => GameKey::Quit,
        }),

        _ => None,
    }
}
