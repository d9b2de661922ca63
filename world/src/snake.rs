//! Segmented snake bodies stored inside the world.

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use snake_hunt_core::{AgentBody, AgentId, Cell, Direction, INITIAL_BODY_LENGTH};

/// Body of a single snake: ordered segments with the head at the front.
///
/// Segments may stack on one cell right after a restate, so coverage is
/// tracked as a per-cell count rather than a set.
#[derive(Clone, Debug)]
pub struct Snake {
    id: AgentId,
    spawn: Cell,
    segments: VecDeque<Cell>,
    coverage: HashMap<Cell, u16>,
    heading: Direction,
    step_interval: Duration,
    accumulator: Duration,
}

impl Snake {
    pub(crate) fn spawn(id: AgentId, spawn: Cell, step_interval: Duration) -> Self {
        let mut snake = Self {
            id,
            spawn,
            segments: VecDeque::with_capacity(INITIAL_BODY_LENGTH),
            coverage: HashMap::new(),
            heading: Direction::default(),
            step_interval,
            accumulator: Duration::ZERO,
        };
        snake.restate();
        snake
    }

    /// Rebuilds the body at the spawn cell facing the default direction.
    pub(crate) fn restate(&mut self) {
        self.segments.clear();
        self.coverage.clear();
        for _ in 0..INITIAL_BODY_LENGTH {
            self.segments.push_back(self.spawn);
            self.cover(self.spawn);
        }
        self.heading = Direction::default();
        self.accumulator = Duration::ZERO;
    }

    /// Agent this body belongs to.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Cell holding the head segment.
    #[must_use]
    pub fn head(&self) -> Cell {
        self.segments.front().copied().unwrap_or(self.spawn)
    }

    /// Segments ordered from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = Cell> + '_ {
        self.segments.iter().copied()
    }

    /// Number of segments, head included.
    #[must_use]
    pub fn length(&self) -> usize {
        self.segments.len()
    }

    /// Heading applied on the next step.
    #[must_use]
    pub const fn heading(&self) -> Direction {
        self.heading
    }

    /// Indicates whether the snake accrued enough time to advance.
    #[must_use]
    pub fn ready_for_step(&self) -> bool {
        self.accumulator >= self.step_interval
    }

    /// Duration accumulated toward the next step.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulator
    }

    pub(crate) fn set_heading(&mut self, direction: Direction) {
        self.heading = direction;
    }

    pub(crate) fn set_step_interval(&mut self, step_interval: Duration) {
        self.step_interval = step_interval;
    }

    pub(crate) fn accumulate(&mut self, dt: Duration) {
        self.accumulator = self.accumulator.saturating_add(dt);
    }

    pub(crate) fn consume_step(&mut self) {
        self.accumulator = self.accumulator.saturating_sub(self.step_interval);
    }

    /// Moves the head onto `next`; the tail stays put when the snake grows.
    pub(crate) fn advance(&mut self, next: Cell, grow: bool) {
        self.segments.push_front(next);
        self.cover(next);

        if grow {
            return;
        }

        if let Some(tail) = self.segments.pop_back() {
            self.uncover(tail);
        }
    }

    fn cover(&mut self, cell: Cell) {
        *self.coverage.entry(cell).or_insert(0) += 1;
    }

    fn uncover(&mut self, cell: Cell) {
        if let Some(count) = self.coverage.get_mut(&cell) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                let _ = self.coverage.remove(&cell);
            }
        }
    }
}

impl AgentBody for Snake {
    fn occupies_cell(&self, cell: Cell) -> bool {
        self.coverage.contains_key(&cell)
    }

    fn current_cell(&self) -> Cell {
        self.head()
    }
}
