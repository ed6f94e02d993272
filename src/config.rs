use std::convert::TryFrom;

use crate::generators::prim::RandPrims;
use crate::grid::{Grid, GridError};

pub const DEFAULT_SIZE: usize = 100;
pub const DEFAULT_SCALE: u32 = 3;

/// Everything needed to build and show one maze.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,

    /// pixels per cell, only the renderer cares
    pub scale: u32,

    /// fixed seed for reproducible mazes, otherwise seeded from the OS
    pub seed: Option<u64>,

    /// generator steps taken between two drawn frames
    pub steps_per_frame: usize,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

impl MazeConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
            seed: None,
            steps_per_frame: 1,
        }
    }

    pub fn generator(&self) -> Result<RandPrims, GridError> {
        let grid = Grid::with_dims(self.width, self.height)?;
        Ok(match self.seed {
            Some(seed) => RandPrims::with_seed(grid, seed),
            None => RandPrims::from_entropy(grid),
        })
    }

    /// window size in physical pixels
    pub fn window_size(&self) -> (u32, u32) {
        let scale = self.scale.max(1);
        let side = |cells: usize| u32::try_from(cells).unwrap_or(u32::MAX).saturating_mul(scale);
        (side(self.width), side(self.height))
    }
}
