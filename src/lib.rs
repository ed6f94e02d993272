pub mod config;
pub mod generators;
pub mod grid;
pub mod render;

#[cfg(feature = "viewer")]
pub mod renderer;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use config::MazeConfig;
pub use generators::prim::RandPrims;
pub use generators::{Generator, SnapshotSink};
pub use grid::{Coord, Grid, GridError};
