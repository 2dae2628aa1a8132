//! Error types shared across the crate.
//!
//! Movement resolution never fails, so nothing in [`crate::game::collision`] returns
//! these. They surface at construction time (bad dimensions or config), when parsing
//! debug maps, and at the collaborator boundaries (persistence and door transitions).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MazeError {
    #[error("maze dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("could not parse maze map at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("door service response had neither `redirect_url` nor `url`")]
    MissingRedirect,

    #[error("door transition failed: {0}")]
    Transition(String),
}

pub type Result<T> = std::result::Result<T, MazeError>;
