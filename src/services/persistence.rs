//! Session persistence: the seed plus where the player stands and looks.
//!
//! The game core never touches storage. It produces a [`SessionSnapshot`] on request and
//! accepts one at startup; a [`SessionStore`] decides where the snapshot lives.

use crate::error::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the single storage slot.
pub const STORAGE_SLOT: &str = "maze_state.json";

/// A plain `{x, y, z}` triple as stored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Persisted session state.
///
/// `rotation` holds pitch in `x` and yaw in `y`, both in degrees; `z` (roll) is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub seed: u32,
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Somewhere a single snapshot can be kept.
pub trait SessionStore {
    /// Overwrites the slot with `snapshot`.
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<()>;

    /// Reads the slot. An empty slot is `Ok(None)`.
    fn load(&self) -> Result<Option<SessionSnapshot>>;

    /// Empties the slot.
    fn clear(&mut self) -> Result<()>;
}

/// Stores the snapshot as JSON in `<dir>/maze_state.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_SLOT),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(snapshot)?)?;
        debug!("saved session for seed {} to {}", snapshot.seed, self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<SessionSnapshot>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&text) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!("ignoring unreadable session file {}: {e}", self.path.display());
                Err(e.into())
            }
        }
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory slot holding the serialised JSON, for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl SessionStore for MemoryStore {
    fn save(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        self.slot = Some(serde_json::to_string(snapshot)?);
        Ok(())
    }

    fn load(&self) -> Result<Option<SessionSnapshot>> {
        self.slot
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(Into::into)
    }

    fn clear(&mut self) -> Result<()> {
        self.slot = None;
        Ok(())
    }
}
