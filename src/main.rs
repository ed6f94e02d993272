use clap::Parser;
use log::{info, trace};

use prim_maze::config::{MazeConfig, DEFAULT_SCALE, DEFAULT_SIZE};
use prim_maze::generators::{Generator, SnapshotSink};
use prim_maze::grid::{Coord, Grid};

/// Grows a perfect maze with randomized Prim's and shows it being carved.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells, also used as the height when HEIGHT is left out
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Maze height in cells
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Pixels per cell in the viewer window
    #[arg(long, default_value_t = DEFAULT_SCALE, value_parser = clap::value_parser!(u32).range(1..))]
    scale: u32,

    /// Random seed, the same seed always carves the same maze
    #[arg(long)]
    seed: Option<u64>,

    /// Generator steps taken between two drawn frames
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    steps_per_frame: u64,

    /// Generate without a window and print the finished maze
    #[arg(long)]
    headless: bool,
}

impl From<&Args> for MazeConfig {
    fn from(args: &Args) -> Self {
        let width = args.width.map_or(DEFAULT_SIZE, |w| w as usize);
        let height = args.height.or(args.width).map_or(DEFAULT_SIZE, |h| h as usize);

        Self {
            scale: args.scale,
            seed: args.seed,
            steps_per_frame: args.steps_per_frame as usize,
            ..MazeConfig::new(width, height)
        }
    }
}

/// Headless stand-in for the window, only counts and traces frames.
#[derive(Default)]
struct FrameLog {
    frames: usize,
}

impl SnapshotSink for FrameLog {
    fn snapshot(&mut self, grid: &Grid, highlight: Option<Coord>) {
        self.frames += 1;
        trace!(
            "frame {}: {:?}, {} passages",
            self.frames,
            highlight,
            grid.passage_count()
        );
    }
}

fn headless(config: &MazeConfig) -> anyhow::Result<()> {
    let mut maze_generator = config.generator()?;
    let mut frames = FrameLog::default();

    maze_generator.generate_maze(&mut frames)?;
    info!("{} frames emitted", frames.frames);

    print!("{}", maze_generator.grid());
    Ok(())
}

#[cfg(feature = "viewer")]
fn show(config: &MazeConfig) -> anyhow::Result<()> {
    prim_maze::viewer::run(config)
}

#[cfg(not(feature = "viewer"))]
fn show(config: &MazeConfig) -> anyhow::Result<()> {
    info!("built without the viewer feature, generating headless");
    headless(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = MazeConfig::from(&args);

    if args.headless {
        headless(&config)
    } else {
        show(&config)
    }
}
