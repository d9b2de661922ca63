#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Hunt engine.
//!
//! This crate defines the message surface that connects the host adapter, the
//! authoritative world, and pure systems. The host submits [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems query immutable views through the
//! collaborator traits declared here ([`OccupancyOracle`], [`WallMap`],
//! [`AgentBody`], [`Sight`]) and respond exclusively with new commands.

use std::{collections::HashSet, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Snake Hunt.";

/// Number of segments a snake carries after being restated.
pub const INITIAL_BODY_LENGTH: usize = 4;

/// Identifies one of the two agents sharing the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentId {
    /// Snake steered by the host on behalf of the player.
    Player,
    /// Autonomous snake driven by the decision system.
    Opponent,
}

impl AgentId {
    /// Every agent in deterministic resolution order.
    pub const ALL: [AgentId; 2] = [AgentId::Player, AgentId::Opponent];

    /// Returns the agent competing against `self`.
    #[must_use]
    pub const fn rival(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }
}

/// Behavioural state held by an autonomous agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Wandering toward randomly sampled destinations.
    #[default]
    Patrol,
    /// Pursuing a visible rival.
    Chase,
}

/// Selects what an autonomous agent paths toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiMode {
    /// Patrols the arena and chases the rival once it becomes visible.
    #[default]
    OpponentChaser,
    /// Heads for the food cell every tick.
    FoodChaser,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the arena layout and restates both agents at their spawns.
    ConfigureArena {
        /// Bounds, walls and spawn cells for the arena.
        layout: ArenaLayout,
    },
    /// Updates the duration an agent must accumulate before taking a step.
    ConfigureStepInterval {
        /// Agent whose cadence changes.
        agent: AgentId,
        /// Minimum simulated time required between successive steps.
        step_interval: Duration,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Points an agent's head toward the provided direction.
    SteerAgent {
        /// Agent being steered.
        agent: AgentId,
        /// Heading applied on the agent's next step.
        direction: Direction,
    },
    /// Moves every agent that accrued enough time by one cell along its heading.
    AdvanceAgents,
    /// Requests that food be placed on the provided cell.
    PlaceFood {
        /// Cell that should hold the food.
        cell: Cell,
    },
    /// Restates both agents and clears the food, starting a new round.
    RestartRound,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a new arena layout became active.
    ArenaConfigured {
        /// Bounds of the configured arena.
        bounds: GridBounds,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an agent adopted a new heading.
    AgentSteered {
        /// Agent that was steered.
        agent: AgentId,
        /// Heading now held by the agent.
        direction: Direction,
    },
    /// Confirms that an agent's head moved between two cells.
    AgentAdvanced {
        /// Agent that advanced.
        agent: AgentId,
        /// Cell the head occupied before moving.
        from: Cell,
        /// Cell the head occupies after moving.
        to: Cell,
    },
    /// Reports that an agent tried to step into a blocked cell and held position.
    AgentCollided {
        /// Agent whose step was refused.
        agent: AgentId,
        /// Cell the agent attempted to enter.
        cell: Cell,
    },
    /// Confirms that food appeared on a cell.
    FoodPlaced {
        /// Cell holding the food.
        cell: Cell,
    },
    /// Reports that a food placement request targeted a blocked cell.
    FoodPlacementRejected {
        /// Cell named by the rejected request.
        cell: Cell,
    },
    /// Confirms that an agent consumed the food and grew.
    FoodEaten {
        /// Agent that ate the food.
        agent: AgentId,
        /// Cell where the food was eaten.
        cell: Cell,
    },
    /// Announces that both agents were restated for a new round.
    RoundRestarted,
}

/// Cardinal movement directions on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing y.
    Up,
    /// Movement toward decreasing y.
    Down,
    /// Movement toward decreasing x.
    Left,
    /// Movement toward increasing x.
    #[default]
    Right,
}

impl Direction {
    /// All directions in neighbour expansion order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset applied to a cell when stepping in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Converts a unit offset back into a direction.
    ///
    /// Returns `None` for the zero vector and for anything that is not a
    /// single orthogonal step.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 1) => Some(Self::Up),
            (0, -1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Location of a single grid square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two cells.
    ///
    /// Opposite corners of the full `i32` plane are farther apart than
    /// `u32::MAX`, hence the wider return type.
    #[must_use]
    pub const fn manhattan_distance(self, other: Cell) -> u64 {
        self.x.abs_diff(other.x) as u64 + self.y.abs_diff(other.y) as u64
    }

    /// Cell reached by stepping once in `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// The four orthogonal neighbours in [`Direction::ALL`] order.
    #[must_use]
    pub const fn neighbors(self) -> [Cell; 4] {
        [
            self.offset(Direction::Up),
            self.offset(Direction::Down),
            self.offset(Direction::Left),
            self.offset(Direction::Right),
        ]
    }

    /// Direction of a single step from `self` to `other`, if they are adjacent.
    #[must_use]
    pub fn direction_to(self, other: Cell) -> Option<Direction> {
        let dx = other.x.checked_sub(self.x)?;
        let dy = other.y.checked_sub(self.y)?;
        Direction::from_delta(dx, dy)
    }
}

/// Half-open integer bounds of the playable grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl GridBounds {
    /// Creates bounds covering `[min_x, max_x) x [min_y, max_y)`.
    pub fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Result<Self, ConfigError> {
        if min_x >= max_x || min_y >= max_y {
            return Err(ConfigError::EmptyBounds {
                min_x,
                max_x,
                min_y,
                max_y,
            });
        }

        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    /// Derives bounds from a world-space area by rounding its corners.
    pub fn from_area(center: Vec2, size: Vec2) -> Result<Self, ConfigError> {
        let half = size * 0.5;
        let min = world_to_cell(center - half);
        let max = world_to_cell(center + half);
        Self::new(min.x(), max.x(), min.y(), max.y())
    }

    /// Inclusive lower x bound.
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Exclusive upper x bound.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Inclusive lower y bound.
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.min_y
    }

    /// Exclusive upper y bound.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Number of columns covered by the bounds.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.max_x.abs_diff(self.min_x)
    }

    /// Number of rows covered by the bounds.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.max_y.abs_diff(self.min_y)
    }

    /// Total number of cells inside the bounds.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let cells = u64::from(self.width()) * u64::from(self.height());
        usize::try_from(cells).unwrap_or(usize::MAX)
    }

    /// Reports whether the cell lies inside the half-open bounds.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.min_x && cell.x < self.max_x && cell.y >= self.min_y && cell.y < self.max_y
    }

    /// Iterates every cell row by row, lowest y first.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..self.max_y).flat_map(move |y| (min_x..max_x).map(move |x| Cell::new(x, y)))
    }
}

/// Maps a world-space position onto the cell whose center is nearest.
///
/// Halfway values round to the even integer on each axis.
#[must_use]
pub fn world_to_cell(position: Vec2) -> Cell {
    Cell::new(
        position.x.round_ties_even() as i32,
        position.y.round_ties_even() as i32,
    )
}

/// Cells crossed by the segment joining two cell centers, endpoints excluded.
///
/// A segment passing exactly through a grid corner touches both cells that
/// share that corner, so both are reported. Cells are produced lazily from
/// `from` toward `to`.
#[must_use]
pub fn cells_between(from: Cell, to: Cell) -> CellsBetween {
    let span_x = i64::from(to.x) - i64::from(from.x);
    let span_y = i64::from(to.y) - i64::from(from.y);
    CellsBetween {
        cursor: from,
        to,
        step_x: span_x.signum() as i32,
        step_y: span_y.signum() as i32,
        length_x: span_x.abs(),
        length_y: span_y.abs(),
        taken_x: 0,
        taken_y: 0,
        pending: [None; 2],
    }
}

/// Iterator returned by [`cells_between`].
#[derive(Clone, Debug)]
pub struct CellsBetween {
    cursor: Cell,
    to: Cell,
    step_x: i32,
    step_y: i32,
    length_x: i64,
    length_y: i64,
    taken_x: i64,
    taken_y: i64,
    pending: [Option<Cell>; 2],
}

impl Iterator for CellsBetween {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if let Some(cell) = self.pending[0].take() {
            self.pending[0] = self.pending[1].take();
            return Some(cell);
        }

        while self.taken_x < self.length_x || self.taken_y < self.length_y {
            let Cell { x, y } = self.cursor;
            // Sign tells which grid line the segment crosses first.
            let decision = (1 + 2 * self.taken_x) * self.length_y
                - (1 + 2 * self.taken_y) * self.length_x;
            if decision == 0 {
                self.cursor = Cell::new(x + self.step_x, y + self.step_y);
                self.taken_x += 1;
                self.taken_y += 1;
                self.pending = [
                    Some(Cell::new(x, y + self.step_y)),
                    (self.cursor != self.to).then_some(self.cursor),
                ];
                return Some(Cell::new(x + self.step_x, y));
            }

            if decision < 0 {
                self.cursor = Cell::new(x + self.step_x, y);
                self.taken_x += 1;
            } else {
                self.cursor = Cell::new(x, y + self.step_y);
                self.taken_y += 1;
            }

            if self.cursor != self.to {
                return Some(self.cursor);
            }
        }

        None
    }
}

/// Static description of an arena: bounds, walls and spawn cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaLayout {
    /// Playable area of the arena.
    pub bounds: GridBounds,
    /// Cells covered by static wall geometry.
    pub walls: Vec<Cell>,
    /// Head cell assigned to the player when a round starts.
    pub player_spawn: Cell,
    /// Head cell assigned to the opponent when a round starts.
    pub opponent_spawn: Cell,
}

impl ArenaLayout {
    /// Creates an open arena with both agents spawning on opposite rows.
    #[must_use]
    pub fn open(bounds: GridBounds) -> Self {
        let player_spawn = Cell::new(bounds.min_x(), bounds.min_y());
        let opponent_spawn = Cell::new(bounds.min_x(), bounds.max_y() - 1);
        Self {
            bounds,
            walls: Vec::new(),
            player_spawn,
            opponent_spawn,
        }
    }

    /// Spawn cell assigned to the provided agent.
    #[must_use]
    pub const fn spawn(&self, agent: AgentId) -> Cell {
        match agent {
            AgentId::Player => self.player_spawn,
            AgentId::Opponent => self.opponent_spawn,
        }
    }

    /// Checks that both spawns sit on walkable cells inside the bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for agent in AgentId::ALL {
            let cell = self.spawn(agent);
            if !self.bounds.contains(cell) || self.walls.contains(&cell) {
                return Err(ConfigError::SpawnBlocked { agent, cell });
            }
        }

        Ok(())
    }
}

/// Configuration failures escalated to the host once at startup.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A query required grid bounds before any arena was configured.
    #[error("grid bounds were never initialised")]
    BoundsUninitialized,
    /// The provided bounds do not contain a single cell.
    #[error("grid bounds [{min_x}, {max_x}) x [{min_y}, {max_y}) contain no cells")]
    EmptyBounds {
        /// Requested inclusive lower x bound.
        min_x: i32,
        /// Requested exclusive upper x bound.
        max_x: i32,
        /// Requested inclusive lower y bound.
        min_y: i32,
        /// Requested exclusive upper y bound.
        max_y: i32,
    },
    /// A spawn cell lies outside the bounds or on a wall.
    #[error("spawn cell {cell:?} for {agent:?} is not walkable")]
    SpawnBlocked {
        /// Agent whose spawn is invalid.
        agent: AgentId,
        /// Offending spawn cell.
        cell: Cell,
    },
}

/// Answers whether a cell may currently be entered.
pub trait OccupancyOracle {
    /// Returns `false` for cells that are out of bounds, walled or occupied.
    fn is_walkable(&self, cell: Cell) -> bool;
}

/// Static wall geometry queried by pathfinding and vision.
pub trait WallMap {
    /// Reports whether wall geometry overlaps the cell.
    fn is_wall_at(&self, cell: Cell) -> bool;

    /// Reports whether a wall lies strictly between the two cell centers.
    fn raycast_blocked(&self, from: Cell, to: Cell) -> bool {
        cells_between(from, to).any(|cell| self.is_wall_at(cell))
    }
}

impl WallMap for HashSet<Cell> {
    fn is_wall_at(&self, cell: Cell) -> bool {
        self.contains(&cell)
    }
}

/// Body of an agent that takes up one or more cells.
pub trait AgentBody {
    /// Reports whether any body segment covers the cell.
    fn occupies_cell(&self, cell: Cell) -> bool;

    /// Cell currently holding the agent's head.
    fn current_cell(&self) -> Cell;
}

/// Line-of-sight test used to gate the chase state.
pub trait Sight {
    /// Reports whether `target` is visible from `origin` within `range` cells.
    fn can_see(&self, origin: Cell, target: Cell, range: u32) -> bool;
}

/// Occupancy oracle composited from bounds, walls and every agent body.
///
/// The snapshot borrows its collaborators, so nothing it reads can change
/// while a search holds it.
#[derive(Clone)]
pub struct Occupancy<'a> {
    bounds: GridBounds,
    walls: &'a dyn WallMap,
    bodies: Vec<&'a dyn AgentBody>,
}

impl<'a> Occupancy<'a> {
    /// Captures a new occupancy snapshot.
    #[must_use]
    pub fn new(bounds: GridBounds, walls: &'a dyn WallMap, bodies: Vec<&'a dyn AgentBody>) -> Self {
        Self {
            bounds,
            walls,
            bodies,
        }
    }

    /// Bounds the snapshot was captured with.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Wall geometry the snapshot consults.
    #[must_use]
    pub fn walls(&self) -> &'a dyn WallMap {
        self.walls
    }
}

impl OccupancyOracle for Occupancy<'_> {
    fn is_walkable(&self, cell: Cell) -> bool {
        self.bounds.contains(cell)
            && !self.walls.is_wall_at(cell)
            && !self.bodies.iter().any(|body| body.occupies_cell(cell))
    }
}

/// Immutable representation of a single agent used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentSnapshot {
    /// Agent described by the snapshot.
    pub id: AgentId,
    /// Cell holding the agent's head.
    pub head: Cell,
    /// Number of body segments, head included.
    pub length: usize,
    /// Heading applied on the next step.
    pub heading: Direction,
    /// Indicates whether the agent accrued enough time to advance.
    pub ready_for_step: bool,
    /// Duration accumulated toward the next step.
    pub accumulated: Duration,
}

/// Read-only snapshot describing every agent in the arena.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Snapshot for the provided agent, if it exists.
    #[must_use]
    pub fn get(&self, agent: AgentId) -> Option<&AgentSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == agent)
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AgentSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Segments(Vec<Cell>);

    impl AgentBody for Segments {
        fn occupies_cell(&self, cell: Cell) -> bool {
            self.0.contains(&cell)
        }

        fn current_cell(&self) -> Cell {
            self.0[0]
        }
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = Cell::new(1, 1);
        let destination = Cell::new(4, -3);
        assert_eq!(origin.manhattan_distance(destination), 7);
        assert_eq!(destination.manhattan_distance(origin), 7);
    }

    #[test]
    fn manhattan_distance_spans_the_whole_plane() {
        let bounds = GridBounds::new(i32::MIN, i32::MAX, i32::MIN, i32::MAX).expect("bounds");
        let low = Cell::new(i32::MIN, i32::MIN);
        let high = Cell::new(i32::MAX - 1, i32::MAX - 1);
        assert!(bounds.contains(low) && bounds.contains(high));

        let expected = 2 * (u64::from(u32::MAX) - 1);
        assert_eq!(low.manhattan_distance(high), expected);
        assert_eq!(high.manhattan_distance(low), expected);
    }

    #[test]
    fn neighbors_follow_expansion_order() {
        let cell = Cell::new(2, 2);
        assert_eq!(
            cell.neighbors(),
            [
                Cell::new(2, 3),
                Cell::new(2, 1),
                Cell::new(1, 2),
                Cell::new(3, 2),
            ]
        );
    }

    #[test]
    fn direction_to_accepts_only_unit_steps() {
        let origin = Cell::new(0, 0);
        assert_eq!(origin.direction_to(Cell::new(0, 1)), Some(Direction::Up));
        assert_eq!(origin.direction_to(Cell::new(-1, 0)), Some(Direction::Left));
        assert_eq!(origin.direction_to(Cell::new(1, 1)), None);
        assert_eq!(origin.direction_to(origin), None);
    }

    #[test]
    fn bounds_are_half_open() {
        let bounds = GridBounds::new(0, 5, 0, 5).expect("bounds");
        assert!(bounds.contains(Cell::new(0, 0)));
        assert!(bounds.contains(Cell::new(4, 4)));
        assert!(!bounds.contains(Cell::new(5, 4)));
        assert!(!bounds.contains(Cell::new(4, 5)));
        assert!(!bounds.contains(Cell::new(-1, 0)));
        assert_eq!(bounds.cells().count(), 25);
        assert_eq!(bounds.cell_count(), 25);
    }

    #[test]
    fn empty_bounds_are_rejected() {
        assert_eq!(
            GridBounds::new(3, 3, 0, 4),
            Err(ConfigError::EmptyBounds {
                min_x: 3,
                max_x: 3,
                min_y: 0,
                max_y: 4,
            })
        );
    }

    #[test]
    fn bounds_from_area_round_corners() {
        let bounds =
            GridBounds::from_area(Vec2::new(0.0, 0.0), Vec2::new(20.0, 10.0)).expect("bounds");
        assert_eq!(
            (bounds.min_x(), bounds.max_x(), bounds.min_y(), bounds.max_y()),
            (-10, 10, -5, 5)
        );
    }

    #[test]
    fn world_to_cell_rounds_to_nearest() {
        assert_eq!(world_to_cell(Vec2::new(1.4, -2.6)), Cell::new(1, -3));
        assert_eq!(world_to_cell(Vec2::new(2.5, 3.5)), Cell::new(2, 4));
    }

    #[test]
    fn cells_between_excludes_endpoints() {
        assert_eq!(
            cells_between(Cell::new(0, 0), Cell::new(3, 0)).collect::<Vec<_>>(),
            vec![Cell::new(1, 0), Cell::new(2, 0)]
        );
        assert_eq!(cells_between(Cell::new(0, 0), Cell::new(1, 0)).next(), None);
        assert_eq!(cells_between(Cell::new(4, 4), Cell::new(4, 4)).next(), None);
    }

    #[test]
    fn cells_between_touches_both_sides_of_a_corner() {
        assert_eq!(
            cells_between(Cell::new(0, 0), Cell::new(1, 1)).collect::<Vec<_>>(),
            vec![Cell::new(1, 0), Cell::new(0, 1)]
        );
        assert_eq!(
            cells_between(Cell::new(0, 0), Cell::new(2, 2)).collect::<Vec<_>>(),
            vec![
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(1, 1),
                Cell::new(2, 1),
                Cell::new(1, 2),
            ]
        );
    }

    #[test]
    fn cells_between_is_lazy_over_long_spans() {
        let mut cells = cells_between(Cell::new(i32::MIN, 0), Cell::new(i32::MAX, 0));
        assert_eq!(cells.next(), Some(Cell::new(i32::MIN + 1, 0)));
        assert_eq!(cells.next(), Some(Cell::new(i32::MIN + 2, 0)));
    }

    #[test]
    fn raycast_stops_at_the_first_wall() {
        struct Counting {
            wall: Cell,
            queried: std::cell::Cell<usize>,
        }

        impl WallMap for Counting {
            fn is_wall_at(&self, cell: Cell) -> bool {
                self.queried.set(self.queried.get() + 1);
                cell == self.wall
            }
        }

        let walls = Counting {
            wall: Cell::new(2, 0),
            queried: std::cell::Cell::new(0),
        };
        assert!(walls.raycast_blocked(Cell::new(0, 0), Cell::new(i32::MAX, 0)));
        assert_eq!(walls.queried.get(), 2);
    }

    #[test]
    fn cells_between_follows_shallow_slopes() {
        assert_eq!(
            cells_between(Cell::new(0, 0), Cell::new(4, 1)).collect::<Vec<_>>(),
            vec![
                Cell::new(1, 0),
                Cell::new(2, 0),
                Cell::new(2, 1),
                Cell::new(3, 1),
            ]
        );
    }

    #[test]
    fn occupancy_unions_bounds_walls_and_bodies() {
        let bounds = GridBounds::new(0, 4, 0, 4).expect("bounds");
        let walls: HashSet<Cell> = [Cell::new(1, 1)].into_iter().collect();
        let snake = Segments(vec![Cell::new(2, 2), Cell::new(2, 3)]);
        let occupancy = Occupancy::new(bounds, &walls, vec![&snake]);

        assert!(occupancy.is_walkable(Cell::new(0, 0)));
        assert!(!occupancy.is_walkable(Cell::new(1, 1)));
        assert!(!occupancy.is_walkable(Cell::new(2, 3)));
        assert!(!occupancy.is_walkable(Cell::new(4, 0)));
        assert!(!occupancy.is_walkable(Cell::new(0, -1)));
    }

    #[test]
    fn layout_validation_rejects_walled_spawn() {
        let bounds = GridBounds::new(0, 4, 0, 4).expect("bounds");
        let mut layout = ArenaLayout::open(bounds);
        assert_eq!(layout.validate(), Ok(()));

        layout.walls.push(layout.opponent_spawn);
        assert_eq!(
            layout.validate(),
            Err(ConfigError::SpawnBlocked {
                agent: AgentId::Opponent,
                cell: Cell::new(0, 3),
            })
        );
    }

    #[test]
    fn arena_layout_round_trips_through_bincode() {
        let bounds = GridBounds::new(-3, 7, 0, 5).expect("bounds");
        let mut layout = ArenaLayout::open(bounds);
        layout.walls.extend([Cell::new(2, 2), Cell::new(2, 3)]);

        let bytes = bincode::serialize(&layout).expect("serialize");
        let restored: ArenaLayout = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, layout);
    }
}
