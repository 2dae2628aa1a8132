//! Mazewalk command line.
//!
//! Drives a headless maze session: print or export the map, list doors, or walk the
//! player for a number of frames. Walking into a door runs the mock transition, and the
//! final position is saved so the next `walk --resume` picks up where this one stopped.
//!
//! # Usage
//! ```text
//! mazewalk --seed 42 print
//! mazewalk -W 20 -H 20 walk --steps 400 --forward
//! RUST_LOG=debug mazewalk walk --resume --forward
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use mazewalk::config::MazeConfig;
use mazewalk::game::keys::{GameKey, KeyState};
use mazewalk::game::{FrameEvent, GameState};
use mazewalk::maze::layout::MazeLayout;
use mazewalk::maze::render_grid_ascii;
use mazewalk::services::debug::DebugConsole;
use mazewalk::services::door_transition::{DoorTransition, MockDoorTransition};
use mazewalk::services::persistence::JsonFileStore;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Maze seed; random when omitted
    #[arg(short, long)]
    seed: Option<u32>,

    /// Maze width in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Maze height in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// JSON file with a full maze configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the saved session and exported maps live
    #[arg(long, default_value = "debug-analytics")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the text map
    Print,
    /// List every door with its hash
    Doors,
    /// Export the text map to a timestamped file
    Save,
    /// Print the walls of a previously exported map
    Load { path: PathBuf },
    /// Simulate the player for a number of frames
    Walk {
        #[arg(long, default_value = "200")]
        steps: u32,
        /// Hold the forward key
        #[arg(long)]
        forward: bool,
        /// Hold the turn-right key
        #[arg(long)]
        turn: bool,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Page URL sent with door requests
        #[arg(long, default_value = "http://localhost:8080/maze")]
        url: String,
        /// Continue from the saved session instead of starting fresh
        #[arg(long)]
        resume: bool,
    },
    /// Delete the saved session
    Clear,
}

fn load_config(args: &Args) -> Result<MazeConfig> {
    let mut config = match &args.config {
        Some(path) => MazeConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => MazeConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    config.validate().context("Invalid maze configuration")?;
    Ok(config)
}

#[allow(clippy::too_many_arguments)]
async fn walk(
    config: MazeConfig,
    seed: Option<u32>,
    console: &DebugConsole,
    store: &mut JsonFileStore,
    steps: u32,
    forward: bool,
    turn: bool,
    dt: f32,
    url: &str,
    resume: bool,
) -> Result<()> {
    let saved = if resume {
        console.load_state(&*store).context("Failed to read saved session")?
    } else {
        None
    };
    let mut state = match saved {
        Some(snapshot) => GameState::resume(config, &snapshot)?,
        None => GameState::new(config, seed)?,
    };

    let mut keys = KeyState::new();
    if forward {
        keys.press_key(GameKey::MoveForward);
    }
    if turn {
        keys.press_key(GameKey::TurnRight);
    }

    let transition = MockDoorTransition::default();
    'frames: for _ in 0..steps {
        for event in state.update(&keys, dt) {
            match event {
                FrameEvent::CellChanged(cell) => debug!("entered cell ({}, {})", cell.x, cell.z),
                FrameEvent::DoorCollision(hit) => {
                    println!(
                        "door at cell ({}, {}) {:?}, {:.2} ahead",
                        hit.door.cell.x, hit.door.cell.z, hit.door.direction, hit.distance
                    );
                    if let Some(request) = state.door_request(url) {
                        let outcome = transition.request_redirect(&request).await;
                        state.end_transition();
                        let redirect = outcome.context("Door transition failed")?;
                        println!("redirect: {redirect}");
                    }
                    break 'frames;
                }
                FrameEvent::PrintMaze => println!("{}", console.print_maze(state.layout())),
                FrameEvent::Quit => break 'frames,
            }
        }
    }

    let snapshot = state.snapshot();
    println!(
        "seed {} after {} frames: position ({:.2}, {:.2}), yaw {:.1}",
        snapshot.seed, state.frame_count, snapshot.position.x, snapshot.position.z, snapshot.rotation.y
    );
    console
        .save_state(store, &snapshot)
        .context("Failed to save session")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    debug!("Starting with {args:?}");

    let console = DebugConsole::new(args.data_dir.join("mazes"));
    let mut store = JsonFileStore::new(&args.data_dir);

    match &args.command {
        Command::Print => {
            let layout = MazeLayout::build(&load_config(&args)?, args.seed)?;
            println!("seed {}", layout.seed());
            print!("{}", console.print_maze(&layout));
        }
        Command::Doors => {
            let layout = MazeLayout::build(&load_config(&args)?, args.seed)?;
            println!("seed {}: {} doors", layout.seed(), layout.doors().len());
            for line in console.door_report(&layout) {
                println!("{line}");
            }
        }
        Command::Save => {
            let layout = MazeLayout::build(&load_config(&args)?, args.seed)?;
            let path = console.save_maze(&layout).context("Failed to export maze")?;
            println!("{}", path.display());
        }
        Command::Load { path } => {
            let grid = console
                .load_maze(path)
                .with_context(|| format!("Failed to read maze from {}", path.display()))?;
            print!("{}", render_grid_ascii(&grid));
        }
        Command::Walk {
            steps,
            forward,
            turn,
            dt,
            url,
            resume,
        } => {
            walk(
                load_config(&args)?,
                args.seed,
                &console,
                &mut store,
                *steps,
                *forward,
                *turn,
                *dt,
                url,
                *resume,
            )
            .await?;
        }
        Command::Clear => console.clear_state(&mut store)?,
    }

    info!("done");
    Ok(())
}
