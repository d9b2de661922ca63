#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision state machine that steers an autonomous snake.
//!
//! Each time the controlled snake is ready to step, the system evaluates
//! whether its rival is visible, flips between patrolling and chasing,
//! resolves a target cell, searches a path toward it and steers the snake
//! along the first step of that path.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_hunt_core::{
    AgentId, AgentState, AgentView, AiMode, Cell, Command, Direction, Event, GridBounds,
    OccupancyOracle, Sight, WallMap,
};
use snake_hunt_system_pathfinding::find_path;
use tracing::{debug, warn};

/// Manhattan range within which the rival can be spotted.
pub const DEFAULT_VISION_RANGE: u32 = 10;

/// Configuration parameters for the decision system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    mode: AiMode,
    vision_range: u32,
    seed: u64,
}

impl Config {
    /// Creates a new configuration from the targeting mode, vision range and
    /// patrol sampling seed.
    #[must_use]
    pub const fn new(mode: AiMode, vision_range: u32, seed: u64) -> Self {
        Self {
            mode,
            vision_range,
            seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(AiMode::OpponentChaser, DEFAULT_VISION_RANGE, 0)
    }
}

/// Collaborators consulted while making a decision.
///
/// Every collaborator is optional. A decision that needs a missing one logs a
/// warning and keeps the previous direction.
#[derive(Clone, Copy, Default)]
pub struct Surroundings<'a> {
    /// Bounds used to sample patrol destinations.
    pub bounds: Option<GridBounds>,
    /// Blocked-cell test used by the path search.
    pub occupancy: Option<&'a dyn OccupancyOracle>,
    /// Static walls, consulted when the chase target sits on a body.
    pub walls: Option<&'a dyn WallMap>,
    /// Visibility test gating the chase state.
    pub sight: Option<&'a dyn Sight>,
    /// Cell currently holding food.
    pub food: Option<Cell>,
}

/// Pure system that steers one snake toward its current target.
#[derive(Debug)]
pub struct Decision {
    agent: AgentId,
    mode: AiMode,
    vision_range: u32,
    state: AgentState,
    patrol_destination: Option<Cell>,
    direction: Direction,
    last_path: Vec<Cell>,
    rng: ChaCha8Rng,
}

impl Decision {
    /// Creates a decision system controlling `agent`.
    #[must_use]
    pub fn new(agent: AgentId, config: Config) -> Self {
        Self {
            agent,
            mode: config.mode,
            vision_range: config.vision_range,
            state: AgentState::Patrol,
            patrol_destination: None,
            direction: Direction::default(),
            last_path: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Consumes world events and views, emitting a steering command whenever
    /// the controlled snake is about to step.
    pub fn handle(
        &mut self,
        events: &[Event],
        agents: &AgentView,
        surroundings: &Surroundings<'_>,
        out: &mut Vec<Command>,
    ) {
        let mut time_advanced = false;
        for event in events {
            match event {
                Event::ArenaConfigured { .. } | Event::RoundRestarted => self.restate(),
                Event::TimeAdvanced { .. } => time_advanced = true,
                _ => {}
            }
        }

        if !time_advanced {
            return;
        }

        let Some(snapshot) = agents.get(self.agent) else {
            warn!(agent = ?self.agent, "controlled snake missing from agent view");
            return;
        };

        if !snapshot.ready_for_step {
            return;
        }

        let opponent = agents.get(self.agent.rival()).map(|rival| rival.head);
        let direction = self.decide_next_direction(snapshot.head, opponent, surroundings);
        out.push(Command::SteerAgent {
            agent: self.agent,
            direction,
        });
    }

    /// Runs one decision cycle and returns the direction the snake should take.
    ///
    /// Failed searches are ordinary outcomes: the previous direction is kept
    /// and, while patrolling, the unreachable destination is dropped so a new
    /// one is sampled on the next cycle.
    pub fn decide_next_direction(
        &mut self,
        self_cell: Cell,
        opponent: Option<Cell>,
        surroundings: &Surroundings<'_>,
    ) -> Direction {
        let Some(occupancy) = surroundings.occupancy else {
            warn!(agent = ?self.agent, "no occupancy source, holding direction");
            return self.direction;
        };

        if self.patrol_destination == Some(self_cell) {
            debug!(agent = ?self.agent, cell = ?self_cell, "patrol destination reached");
            self.patrol_destination = None;
        }

        let target = match self.mode {
            AiMode::OpponentChaser => {
                let (Some(opponent), Some(sight)) = (opponent, surroundings.sight) else {
                    warn!(agent = ?self.agent, "no rival or sight test, holding direction");
                    return self.direction;
                };

                let visible = sight.can_see(self_cell, opponent, self.vision_range);
                match self.observe(visible) {
                    AgentState::Chase => opponent,
                    AgentState::Patrol => match self.patrol_target(surroundings, occupancy) {
                        Some(destination) => destination,
                        None => return self.direction,
                    },
                }
            }
            AiMode::FoodChaser => {
                if let (Some(opponent), Some(sight)) = (opponent, surroundings.sight) {
                    let _ = self.observe(sight.can_see(self_cell, opponent, self.vision_range));
                }

                let Some(food) = surroundings.food else {
                    debug!(agent = ?self.agent, "no food to chase");
                    return self.direction;
                };
                food
            }
        };

        let path = if self.mode == AiMode::OpponentChaser && self.state == AgentState::Chase {
            let oracle = ReachableTarget {
                inner: occupancy,
                target,
                bounds: surroundings.bounds,
                walls: surroundings.walls,
            };
            find_path(self_cell, target, &oracle)
        } else {
            find_path(self_cell, target, occupancy)
        };

        match path {
            Some(path) => {
                if let Some(direction) = path.first().and_then(|&next| self_cell.direction_to(next))
                {
                    self.direction = direction;
                }
                self.last_path = path;
            }
            None => {
                self.last_path.clear();
                if self.mode == AiMode::OpponentChaser && self.state == AgentState::Patrol {
                    debug!(
                        agent = ?self.agent,
                        destination = ?self.patrol_destination,
                        "patrol destination unreachable"
                    );
                    self.patrol_destination = None;
                }
            }
        }

        self.direction
    }

    /// Applies one visibility result to the state machine.
    ///
    /// Losing sight of the rival also drops the held patrol destination.
    pub fn observe(&mut self, visible: bool) -> AgentState {
        match (self.state, visible) {
            (AgentState::Patrol, true) => {
                debug!(agent = ?self.agent, "rival spotted, chasing");
                self.state = AgentState::Chase;
            }
            (AgentState::Chase, false) => {
                debug!(agent = ?self.agent, "rival lost, patrolling");
                self.state = AgentState::Patrol;
                self.patrol_destination = None;
            }
            _ => {}
        }

        self.state
    }

    /// Returns the system to its round-start state.
    pub fn restate(&mut self) {
        self.state = AgentState::Patrol;
        self.patrol_destination = None;
        self.direction = Direction::default();
        self.last_path.clear();
    }

    /// Agent controlled by this system.
    #[must_use]
    pub const fn agent(&self) -> AgentId {
        self.agent
    }

    /// Current behavioural state.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Path produced by the most recent search, empty when it failed.
    #[must_use]
    pub fn last_path(&self) -> &[Cell] {
        &self.last_path
    }

    /// Destination held while patrolling.
    #[must_use]
    pub const fn patrol_destination(&self) -> Option<Cell> {
        self.patrol_destination
    }

    /// Direction produced by the most recent decision.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    fn patrol_target(
        &mut self,
        surroundings: &Surroundings<'_>,
        occupancy: &dyn OccupancyOracle,
    ) -> Option<Cell> {
        if let Some(destination) = self.patrol_destination {
            return Some(destination);
        }

        let Some(bounds) = surroundings.bounds else {
            warn!(agent = ?self.agent, "grid bounds unavailable, cannot sample patrol destination");
            return None;
        };

        let candidates: Vec<Cell> = bounds
            .cells()
            .filter(|&cell| occupancy.is_walkable(cell))
            .collect();
        if candidates.is_empty() {
            debug!(agent = ?self.agent, "no walkable cell to patrol toward");
            return None;
        }

        let destination = candidates[self.rng.gen_range(0..candidates.len())];
        debug!(agent = ?self.agent, ?destination, "new patrol destination");
        self.patrol_destination = Some(destination);
        Some(destination)
    }
}

/// Lets the search enter the chase target even though a body covers it.
///
/// Without known bounds only the wall check applies to the target.
struct ReachableTarget<'a> {
    inner: &'a dyn OccupancyOracle,
    target: Cell,
    bounds: Option<GridBounds>,
    walls: Option<&'a dyn WallMap>,
}

impl OccupancyOracle for ReachableTarget<'_> {
    fn is_walkable(&self, cell: Cell) -> bool {
        if cell == self.target
            && self.bounds.map_or(true, |bounds| bounds.contains(cell))
            && !self.walls.is_some_and(|walls| walls.is_wall_at(cell))
        {
            return true;
        }

        self.inner.is_walkable(cell)
    }
}
