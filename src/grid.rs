use std::fmt;

/// `(x, y)` where `x` is the column and `y` the row.
pub type Coord = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    West,
    East,
    North,
    South,
}

impl Direction {
    /// probe order used by frontier and neighbour discovery
    pub const ALL: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    InvalidDimension { width: usize, height: usize },
    OutOfBounds { coord: Coord, dims: Dimensions },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidDimension { width, height } => write!(
                f,
                "invalid grid dimensions {}x{}, both must be positive and their product fit in usize",
                width, height
            ),
            GridError::OutOfBounds { coord, dims } => write!(
                f,
                "cell ({}, {}) is outside the {}x{} grid",
                coord.0, coord.1, dims.width, dims.height
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Two-colour maze buffer, `true` is passage and `false` is wall.
///
/// Dimensions are fixed at construction. Every cell starts out as a wall and
/// the only way to change one is `set_passage`, so a cell never goes back to
/// being a wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dims: Dimensions,

    /// row major, `cells[y * width + x]`
    cells: Vec<bool>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Self::with_dims(width, height)
    }

    pub fn with_dims(width: usize, height: usize) -> Result<Self, GridError> {
        let area = match width.checked_mul(height) {
            Some(area) if area > 0 => area,
            _ => return Err(GridError::InvalidDimension { width, height }),
        };

        Ok(Self {
            cells: vec![false; area],
            dims: Dimensions { width, height },
        })
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// number of cells
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, (x, y): Coord) -> bool {
        x < self.dims.width && y < self.dims.height
    }

    fn index_of(&self, coord: Coord) -> Result<usize, GridError> {
        if self.contains(coord) {
            Ok(coord.1 * self.dims.width + coord.0)
        } else {
            Err(GridError::OutOfBounds {
                coord,
                dims: self.dims,
            })
        }
    }

    pub fn is_passage(&self, x: usize, y: usize) -> Result<bool, GridError> {
        let index = self.index_of((x, y))?;
        Ok(self.cells[index])
    }

    pub fn set_passage(&mut self, x: usize, y: usize) -> Result<(), GridError> {
        let index = self.index_of((x, y))?;
        self.cells[index] = true;
        Ok(())
    }

    /// `None` outside the grid
    pub fn get(&self, coord: Coord) -> Option<bool> {
        self.index_of(coord).ok().map(|index| self.cells[index])
    }

    /// Moves `distance` cells from `coord` in `direction`, `None` if that
    /// leaves the grid.
    pub fn offset(&self, coord: Coord, direction: Direction, distance: usize) -> Option<Coord> {
        let (x, y) = coord;
        let target = match direction {
            Direction::West => (x.checked_sub(distance)?, y),
            Direction::East => (x.checked_add(distance)?, y),
            Direction::North => (x, y.checked_sub(distance)?),
            Direction::South => (x, y.checked_add(distance)?),
        };

        if self.contains(target) {
            Some(target)
        } else {
            None
        }
    }

    pub fn passage_count(&self) -> usize {
        self.cells.iter().filter(|&&passage| passage).count()
    }

    /// row major walk over every cell
    pub fn cells(&self) -> impl Iterator<Item = (Coord, bool)> + '_ {
        let width = self.dims.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, &passage)| ((index % width, index / width), passage))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.dims.width) {
            for &passage in row {
                f.write_str(if passage { " " } else { "#" })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
