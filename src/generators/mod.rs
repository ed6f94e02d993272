pub mod prim;

use crate::grid::{Coord, Grid, GridError};

pub trait Generator {
    /// Advances one step: the seed placement or a single growing iteration.
    /// Returns `None` once the maze is finished.
    fn step_generation(&mut self) -> Result<Option<Step>, GridError>;

    /// Like `step_generation`, handing the step's snapshot to `sink`.
    fn step_with(&mut self, sink: &mut dyn SnapshotSink) -> Result<Option<Step>, GridError>;

    /// Runs to completion, handing every intermediate grid to `sink`.
    fn generate_maze(&mut self, sink: &mut dyn SnapshotSink) -> Result<(), GridError>;

    fn is_done(&self) -> bool;

    fn grid(&self) -> &Grid;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Seeding,
    Growing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Seeded(Coord),
    /// a frontier cell was popped, `connected_to` is the passage it was joined
    /// with, if any
    Visited {
        cell: Coord,
        connected_to: Option<Coord>,
    },
}

impl Step {
    /// the cell a renderer should highlight for this step
    pub fn cell(&self) -> Coord {
        match *self {
            Step::Seeded(cell) => cell,
            Step::Visited { cell, .. } => cell,
        }
    }
}

/// Receives the grid as it is being carved.
///
/// `highlight` is the seed on the first call, the cell just popped from the
/// frontier on every growing iteration and `None` on the final, finished frame.
pub trait SnapshotSink {
    fn snapshot(&mut self, grid: &Grid, highlight: Option<Coord>);
}

/// Discards every snapshot, for headless generation.
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn snapshot(&mut self, _grid: &Grid, _highlight: Option<Coord>) {}
}

/// Keeps a copy of the most recent snapshot, for renderers that draw at
/// their own pace rather than once per step.
#[derive(Debug, Default, Clone)]
pub struct LastSnapshot {
    grid: Option<Grid>,
    highlight: Option<Coord>,
}

impl LastSnapshot {
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn highlight(&self) -> Option<Coord> {
        self.highlight
    }
}

impl SnapshotSink for LastSnapshot {
    fn snapshot(&mut self, grid: &Grid, highlight: Option<Coord>) {
        match &mut self.grid {
            Some(kept) => kept.clone_from(grid),
            None => self.grid = Some(grid.clone()),
        }
        self.highlight = highlight;
    }
}

impl<F> SnapshotSink for F
where
    F: FnMut(&Grid, Option<Coord>),
{
    fn snapshot(&mut self, grid: &Grid, highlight: Option<Coord>) {
        self(grid, highlight)
    }
}
