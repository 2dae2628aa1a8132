//! Debug console: explicit introspection of a running session.
//!
//! The console is handed to whoever needs it rather than living in a global. It can
//! print the map, export it to a timestamped `.mz` file, and save, load or clear the
//! persisted session through a [`SessionStore`].

use crate::error::Result;
use crate::maze::generator::Grid;
use crate::maze::layout::MazeLayout;
use crate::maze::{parse_maze_file, render_ascii};
use crate::services::persistence::{SessionSnapshot, SessionStore};
use chrono::Local;
use log::info;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory maps are exported to unless told otherwise.
pub const DEFAULT_EXPORT_DIR: &str = "debug-analytics/mazes";

#[derive(Debug, Clone)]
pub struct DebugConsole {
    export_dir: PathBuf,
}

impl Default for DebugConsole {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_DIR)
    }
}

impl DebugConsole {
    pub fn new(export_dir: impl AsRef<Path>) -> Self {
        Self {
            export_dir: export_dir.as_ref().to_path_buf(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// The layout's text map, also written to the log.
    pub fn print_maze(&self, layout: &MazeLayout) -> String {
        let map = render_ascii(layout);
        info!("maze (seed {}):\n{map}", layout.seed());
        map
    }

    /// One line per door: cell, side and hash.
    pub fn door_report(&self, layout: &MazeLayout) -> Vec<String> {
        layout
            .door_segments()
            .iter()
            .map(|segment| {
                format!(
                    "({}, {}) {} {}",
                    segment.door.cell.x,
                    segment.door.cell.z,
                    segment.door.direction.letter(),
                    segment.hash()
                )
            })
            .collect()
    }

    /// Writes the text map to `Maze_<timestamp>_seed<seed>.mz` in the export directory.
    pub fn save_maze(&self, layout: &MazeLayout) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.export_dir)?;

        let timestamp = Local::now().format("Maze_%m-%d-%y_%I-%M-%S%p");
        let file_path = self
            .export_dir
            .join(format!("{timestamp}_seed{}.mz", layout.seed()));

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&file_path)?;
        file.write_all(render_ascii(layout).as_bytes())?;

        info!("maze saved to {}", file_path.display());
        Ok(file_path)
    }

    /// Reads a previously exported map back into a grid.
    pub fn load_maze(&self, path: impl AsRef<Path>) -> Result<Grid> {
        let grid = parse_maze_file(path.as_ref())?;
        info!(
            "loaded {}x{} maze from {}",
            grid.width(),
            grid.height(),
            path.as_ref().display()
        );
        Ok(grid)
    }

    pub fn save_state(&self, store: &mut dyn SessionStore, snapshot: &SessionSnapshot) -> Result<()> {
        store.save(snapshot)?;
        info!("session saved (seed {})", snapshot.seed);
        Ok(())
    }

    pub fn load_state(&self, store: &dyn SessionStore) -> Result<Option<SessionSnapshot>> {
        let snapshot = store.load()?;
        match &snapshot {
            Some(s) => info!("session loaded (seed {})", s.seed),
            None => info!("no saved session"),
        }
        Ok(snapshot)
    }

    pub fn clear_state(&self, store: &mut dyn SessionStore) -> Result<()> {
        store.clear()?;
        info!("saved session cleared");
        Ok(())
    }
}
