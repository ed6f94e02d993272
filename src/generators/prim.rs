use crate::generators::{Generator, GeneratorState, NullSink, SnapshotSink, Step};
use crate::grid::{Coord, Direction, Grid, GridError};
use log::{debug, info, trace};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Distance between two maze cells; the cell halfway is the wall that gets
/// knocked out when they are connected.
const CELL_STRIDE: usize = 2;

/// Wall cells waiting to be connected. A cell is queued at most once at a
/// time, entries are checked against the live grid when popped.
struct Frontier {
    cells: Vec<Coord>,
    queued: Vec<bool>,
    width: usize,
}

impl Frontier {
    fn for_grid(grid: &Grid) -> Self {
        Self {
            cells: Vec::new(),
            queued: vec![false; grid.area()],
            width: grid.width(),
        }
    }

    fn insert(&mut self, (x, y): Coord) {
        let index = y * self.width + x;
        if !self.queued[index] {
            self.queued[index] = true;
            self.cells.push((x, y));
        }
    }

    fn take_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Coord> {
        if self.cells.is_empty() {
            return None;
        }

        let (x, y) = self.cells.swap_remove(rng.gen_range(0, self.cells.len()));
        self.queued[y * self.width + x] = false;

        Some((x, y))
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Randomized Prim's maze growth.
///
/// Starting from one random passage, repeatedly pick a random frontier wall,
/// join it to a random passage two cells away and queue up the walls around
/// it. Every wall is joined exactly once so the passages always form a tree.
pub struct RandPrims<R = StdRng> {
    grid: Grid,
    frontier: Frontier,
    rng: R,
    state: GeneratorState,
    steps: usize,
}

impl RandPrims<StdRng> {
    pub fn with_seed(grid: Grid, seed: u64) -> Self {
        Self::new(grid, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(grid: Grid) -> Self {
        Self::new(grid, StdRng::from_entropy())
    }
}

impl<R: Rng> RandPrims<R> {
    pub fn new(grid: Grid, rng: R) -> Self {
        let frontier = Frontier::for_grid(&grid);
        Self {
            grid,
            frontier,
            rng,
            state: GeneratorState::Seeding,
            steps: 0,
        }
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Walls exactly two cells away from `coord`, diagonals excluded.
    pub fn frontier(&self, coord: Coord) -> Vec<Coord> {
        self.cells_at_stride(coord, false)
    }

    /// Passages exactly two cells away from `coord`, diagonals excluded.
    pub fn neighbours(&self, coord: Coord) -> Vec<Coord> {
        self.cells_at_stride(coord, true)
    }

    fn cells_at_stride(&self, coord: Coord, passage: bool) -> Vec<Coord> {
        if !self.grid.contains(coord) {
            return Vec::new();
        }

        Direction::ALL
            .iter()
            .filter_map(|&direction| self.grid.offset(coord, direction, CELL_STRIDE))
            .filter(|&cell| self.grid.get(cell) == Some(passage))
            .collect()
    }

    /// Turns `wall` and the cell between it and `passage` into passages.
    /// The two cells must be exactly `CELL_STRIDE` apart along one axis.
    pub fn connect(&mut self, wall: Coord, passage: Coord) -> Result<(), GridError> {
        debug_assert!(
            is_stride_apart(wall, passage),
            "{:?} and {:?} are not two cells apart",
            wall,
            passage
        );

        let between = ((wall.0 + passage.0) / 2, (wall.1 + passage.1) / 2);
        self.grid.set_passage(wall.0, wall.1)?;
        self.grid.set_passage(between.0, between.1)
    }

    fn queue_frontier_of(&mut self, coord: Coord) {
        for cell in self.frontier(coord) {
            self.frontier.insert(cell);
        }
    }

    fn seed(&mut self, sink: &mut dyn SnapshotSink) -> Result<Step, GridError> {
        let seed = (
            self.rng.gen_range(0, self.grid.width()),
            self.rng.gen_range(0, self.grid.height()),
        );
        debug!(
            "seeding {}x{} maze at {:?}",
            self.grid.width(),
            self.grid.height(),
            seed
        );

        self.grid.set_passage(seed.0, seed.1)?;
        self.queue_frontier_of(seed);
        sink.snapshot(&self.grid, Some(seed));

        if self.frontier.is_empty() {
            self.finish();
        } else {
            self.state = GeneratorState::Growing;
        }

        Ok(Step::Seeded(seed))
    }

    fn grow(&mut self, sink: &mut dyn SnapshotSink) -> Result<Option<Step>, GridError> {
        let cell = match self.frontier.take_random(&mut self.rng) {
            Some(cell) => cell,
            None => {
                self.finish();
                return Ok(None);
            }
        };

        sink.snapshot(&self.grid, Some(cell));

        // Queued cells are always walls with a passage two cells away, so both
        // checks below pass; a carved cell is never joined twice regardless.
        let mut connected_to = None;
        if self.grid.get(cell) == Some(false) {
            let neighbours = self.neighbours(cell);
            if let Some(&passage) = neighbours.choose(&mut self.rng) {
                self.connect(cell, passage)?;
                connected_to = Some(passage);
            }
        }

        // uses the post-connect state of `cell`
        self.queue_frontier_of(cell);
        trace!(
            "visited {:?}, joined to {:?}, {} queued",
            cell,
            connected_to,
            self.frontier.len()
        );

        if self.frontier.is_empty() {
            self.finish();
        }

        Ok(Some(Step::Visited { cell, connected_to }))
    }

    fn finish(&mut self) {
        self.state = GeneratorState::Done;
        info!(
            "maze finished after {} steps, {} of {} cells are passages",
            self.steps + 1,
            self.grid.passage_count(),
            self.grid.area()
        );
    }

    fn advance(&mut self, sink: &mut dyn SnapshotSink) -> Result<Option<Step>, GridError> {
        let step = match self.state {
            GeneratorState::Seeding => Some(self.seed(sink)?),
            GeneratorState::Growing => self.grow(sink)?,
            GeneratorState::Done => None,
        };

        if step.is_some() {
            self.steps += 1;
        }

        Ok(step)
    }
}

impl<R: Rng> Generator for RandPrims<R> {
    fn step_generation(&mut self) -> Result<Option<Step>, GridError> {
        self.advance(&mut NullSink)
    }

    fn step_with(&mut self, sink: &mut dyn SnapshotSink) -> Result<Option<Step>, GridError> {
        self.advance(sink)
    }

    fn generate_maze(&mut self, sink: &mut dyn SnapshotSink) -> Result<(), GridError> {
        while self.advance(sink)?.is_some() {}
        sink.snapshot(&self.grid, None);

        Ok(())
    }

    fn is_done(&self) -> bool {
        self.state == GeneratorState::Done
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }
}

fn is_stride_apart(a: Coord, b: Coord) -> bool {
    let dx = if a.0 > b.0 { a.0 - b.0 } else { b.0 - a.0 };
    let dy = if a.1 > b.1 { a.1 - b.1 } else { b.1 - a.1 };

    (dx == CELL_STRIDE && dy == 0) || (dx == 0 && dy == CELL_STRIDE)
}

#[cfg(test)]
mod test_prim {
    use super::*;
    use crate::generators::LastSnapshot;
    use std::collections::VecDeque;

    fn generate(width: usize, height: usize, seed: u64) -> RandPrims {
        let mut generator = RandPrims::with_seed(Grid::new(width, height).unwrap(), seed);
        generator.generate_maze(&mut NullSink).unwrap();
        generator
    }

    fn adjacent_passages(grid: &Grid, (x, y): Coord) -> Vec<Coord> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| grid.offset((x, y), direction, 1))
            .filter(|&cell| grid.get(cell) == Some(true))
            .collect()
    }

    /// connected, and exactly `passages - 1` edges between adjacent passages
    fn assert_perfect(grid: &Grid) {
        let passages: Vec<Coord> = grid
            .cells()
            .filter(|&(_, passage)| passage)
            .map(|(coord, _)| coord)
            .collect();
        assert!(!passages.is_empty());

        let edges: usize = passages
            .iter()
            .map(|&cell| adjacent_passages(grid, cell).len())
            .sum::<usize>()
            / 2;
        assert_eq!(edges, passages.len() - 1, "passage graph has a cycle\n{}", grid);

        let mut seen = vec![false; grid.width() * grid.height()];
        let mut queue = VecDeque::new();
        queue.push_back(passages[0]);
        seen[passages[0].1 * grid.width() + passages[0].0] = true;
        let mut reached = 1;
        while let Some(cell) = queue.pop_front() {
            for next in adjacent_passages(grid, cell) {
                let index = next.1 * grid.width() + next.0;
                if !seen[index] {
                    seen[index] = true;
                    reached += 1;
                    queue.push_back(next);
                }
            }
        }
        assert_eq!(reached, passages.len(), "passages are disconnected\n{}", grid);
    }

    #[test]
    fn generates_perfect_mazes() {
        for &(width, height) in &[(2, 2), (3, 3), (7, 5), (10, 10), (21, 13), (1, 9), (40, 3)] {
            for seed in 0..8 {
                let generator = generate(width, height, seed);
                assert!(generator.is_done());
                assert_eq!(generator.frontier_len(), 0);
                assert_perfect(generator.grid());
            }
        }
    }

    #[test]
    fn spans_every_cell_on_the_seed_lattice() {
        for seed in 0..10 {
            let mut generator = RandPrims::with_seed(Grid::new(15, 11).unwrap(), seed);
            let origin = generator.step_generation().unwrap().unwrap().cell();
            while generator.step_generation().unwrap().is_some() {}

            let grid = generator.grid();
            for ((x, y), passage) in grid.cells() {
                let on_x = x % 2 == origin.0 % 2;
                let on_y = y % 2 == origin.1 % 2;
                if on_x && on_y {
                    assert!(passage, "lattice cell {:?} was never reached", (x, y));
                } else if !on_x && !on_y {
                    assert!(!passage, "diagonal gap {:?} was carved", (x, y));
                }
            }
        }
    }

    #[test]
    fn single_cell_grid_is_one_passage() {
        let mut generator = RandPrims::with_seed(Grid::new(1, 1).unwrap(), 42);

        assert_eq!(generator.step_generation().unwrap(), Some(Step::Seeded((0, 0))));
        assert!(generator.is_done());
        assert_eq!(generator.step_generation().unwrap(), None);
        assert_eq!(generator.grid().passage_count(), 1);
        assert_eq!(generator.steps(), 1);
    }

    #[test]
    fn one_row_grid_is_a_straight_corridor() {
        for seed in 0..32 {
            let mut generator = RandPrims::with_seed(Grid::new(5, 1).unwrap(), seed);
            let origin = generator.step_generation().unwrap().unwrap().cell();
            while generator.step_generation().unwrap().is_some() {}

            let row: String = generator.grid().to_string();
            if origin.0 % 2 == 0 {
                assert_eq!(row, "     \n");
            } else {
                assert_eq!(row, "#   #\n");
            }
        }
    }

    #[test]
    fn frontier_and_neighbours_look_two_cells_away() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_passage(2, 2).unwrap();
        let generator = RandPrims::with_seed(grid, 0);

        assert_eq!(
            generator.frontier((2, 2)),
            vec![(0, 2), (4, 2), (2, 0), (2, 4)]
        );
        assert_eq!(generator.frontier((0, 0)), vec![(2, 0), (0, 2)]);
        assert_eq!(generator.frontier((0, 2)), vec![(0, 0), (0, 4)]);
        assert_eq!(generator.neighbours((0, 2)), vec![(2, 2)]);
        assert_eq!(generator.neighbours((2, 4)), vec![(2, 2)]);
        // diagonals and distance one never count
        assert!(generator.neighbours((4, 4)).is_empty());
        assert!(generator.neighbours((2, 3)).is_empty());
        assert!(generator.frontier((5, 0)).is_empty());
        assert!(generator.neighbours((0, 9)).is_empty());
    }

    #[test]
    fn connect_carves_exactly_two_cells() {
        let pairs = [
            ((0, 2), (2, 2)),
            ((4, 2), (2, 2)),
            ((2, 0), (2, 2)),
            ((2, 4), (2, 2)),
            ((3, 1), (3, 3)),
        ];

        for &(wall, passage) in &pairs {
            let mut generator = RandPrims::with_seed(Grid::new(5, 5).unwrap(), 0);
            let before = generator.grid().clone();
            generator.connect(wall, passage).unwrap();

            let between = ((wall.0 + passage.0) / 2, (wall.1 + passage.1) / 2);
            let changed: Vec<Coord> = generator
                .grid()
                .cells()
                .zip(before.cells())
                .filter(|((_, after), (_, before))| after != before)
                .map(|((coord, _), _)| coord)
                .collect();

            let mut expected = vec![wall, between];
            expected.sort_by_key(|&(x, y)| (y, x));
            assert_eq!(changed, expected);
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let record = |seed: u64| {
            let mut highlights = Vec::new();
            let mut generator = RandPrims::with_seed(Grid::new(17, 9).unwrap(), seed);
            generator
                .generate_maze(&mut |_: &Grid, highlight: Option<Coord>| {
                    highlights.push(highlight)
                })
                .unwrap();
            (generator.into_grid(), highlights)
        };

        assert_eq!(record(7), record(7));
        assert_ne!(record(7).0, record(8).0);
    }

    #[test]
    fn snapshots_are_taken_before_carving() {
        let mut frames = 0;
        let mut last = Some((0, 0));
        let mut generator = RandPrims::with_seed(Grid::new(9, 9).unwrap(), 3);

        generator
            .generate_maze(&mut |grid: &Grid, highlight: Option<Coord>| {
                if frames == 0 {
                    // the seed is already placed
                    assert_eq!(grid.passage_count(), 1);
                    assert_eq!(grid.get(highlight.unwrap()), Some(true));
                } else if let Some(cell) = highlight {
                    assert_eq!(grid.get(cell), Some(false));
                }
                frames += 1;
                last = highlight;
            })
            .unwrap();

        // one frame per step plus the finished maze
        assert_eq!(frames, generator.steps() + 1);
        assert_eq!(last, None);
    }

    #[test]
    fn stepping_matches_full_generation() {
        let mut stepped = RandPrims::with_seed(Grid::new(12, 8).unwrap(), 99);
        assert_eq!(stepped.state(), GeneratorState::Seeding);

        let mut visits = 0;
        while let Some(step) = stepped.step_generation().unwrap() {
            if let Step::Visited { connected_to, .. } = step {
                assert_eq!(stepped.state() == GeneratorState::Done, stepped.frontier_len() == 0);
                assert!(connected_to.is_some());
                visits += 1;
            }
        }

        let full = generate(12, 8, 99);
        assert_eq!(stepped.grid(), full.grid());
        assert_eq!(visits + 1, full.steps());
        // every visit carves two cells on top of the seed
        assert_eq!(full.grid().passage_count(), 1 + 2 * visits);
    }

    #[test]
    fn last_snapshot_shows_the_popped_wall() {
        let mut generator = RandPrims::with_seed(Grid::new(11, 9).unwrap(), 21);
        let mut frame = LastSnapshot::default();
        assert!(frame.grid().is_none());

        let seed = generator.step_with(&mut frame).unwrap().unwrap().cell();
        assert_eq!(frame.highlight(), Some(seed));
        assert_eq!(frame.grid(), Some(generator.grid()));

        while let Some(step) = generator.step_with(&mut frame).unwrap() {
            let cell = step.cell();
            assert_eq!(frame.highlight(), Some(cell));

            // the frame was taken before the wall was knocked out
            let shown = frame.grid().unwrap();
            assert_eq!(shown.get(cell), Some(false));
            assert_eq!(generator.grid().get(cell), Some(true));
            assert_eq!(shown.passage_count() + 2, generator.grid().passage_count());
        }

        assert!(generator.is_done());
    }
}
