#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snake Hunt.

mod snake;
mod walls;

use std::time::Duration;

use snake_hunt_core::{
    AgentBody, AgentId, ArenaLayout, Cell, Command, Event, WallMap, WELCOME_BANNER,
};
use tracing::debug;

pub use snake::Snake;
pub use walls::WallLayout;

const DEFAULT_PLAYER_STEP: Duration = Duration::from_nanos(1_000_000_000 / 15);
const DEFAULT_OPPONENT_STEP: Duration = Duration::from_nanos(1_000_000_000 / 14);

/// Represents the authoritative Snake Hunt world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    layout: Option<ArenaLayout>,
    walls: WallLayout,
    snakes: Vec<Snake>,
    food: Option<Cell>,
    player_step: Duration,
    opponent_step: Duration,
    tick_index: u64,
}

impl World {
    /// Creates an empty world awaiting an arena configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            layout: None,
            walls: WallLayout::default(),
            snakes: Vec::new(),
            food: None,
            player_step: DEFAULT_PLAYER_STEP,
            opponent_step: DEFAULT_OPPONENT_STEP,
            tick_index: 0,
        }
    }

    fn step_interval(&self, agent: AgentId) -> Duration {
        match agent {
            AgentId::Player => self.player_step,
            AgentId::Opponent => self.opponent_step,
        }
    }

    fn snake_mut(&mut self, agent: AgentId) -> Option<&mut Snake> {
        self.snakes.iter_mut().find(|snake| snake.id() == agent)
    }

    fn is_walkable(&self, cell: Cell) -> bool {
        let Some(layout) = &self.layout else {
            return false;
        };

        layout.bounds.contains(cell)
            && !self.walls.is_wall_at(cell)
            && !self.snakes.iter().any(|snake| snake.occupies_cell(cell))
    }

    fn advance_agents(&mut self, out_events: &mut Vec<Event>) {
        if self.layout.is_none() {
            return;
        }

        for index in 0..self.snakes.len() {
            if !self.snakes[index].ready_for_step() {
                continue;
            }

            let agent = self.snakes[index].id();
            let from = self.snakes[index].head();
            let next = from.offset(self.snakes[index].heading());
            let blocked = !self.is_walkable(next);
            self.snakes[index].consume_step();

            if blocked {
                debug!(?agent, ?next, "step refused");
                out_events.push(Event::AgentCollided { agent, cell: next });
                continue;
            }

            let ate = self.food == Some(next);
            self.snakes[index].advance(next, ate);
            out_events.push(Event::AgentAdvanced {
                agent,
                from,
                to: next,
            });

            if ate {
                self.food = None;
                debug!(?agent, cell = ?next, "food eaten");
                out_events.push(Event::FoodEaten { agent, cell: next });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena { layout } => {
            world.walls = WallLayout::from_cells(&layout.walls);
            world.snakes = AgentId::ALL
                .into_iter()
                .map(|agent| Snake::spawn(agent, layout.spawn(agent), world.step_interval(agent)))
                .collect();
            world.food = None;
            world.tick_index = 0;
            let bounds = layout.bounds;
            world.layout = Some(layout);
            out_events.push(Event::ArenaConfigured { bounds });
        }
        Command::ConfigureStepInterval {
            agent,
            step_interval,
        } => {
            match agent {
                AgentId::Player => world.player_step = step_interval,
                AgentId::Opponent => world.opponent_step = step_interval,
            }
            if let Some(snake) = world.snake_mut(agent) {
                snake.set_step_interval(step_interval);
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            for snake in &mut world.snakes {
                snake.accumulate(dt);
            }
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SteerAgent { agent, direction } => {
            if let Some(snake) = world.snake_mut(agent) {
                snake.set_heading(direction);
                out_events.push(Event::AgentSteered { agent, direction });
            }
        }
        Command::AdvanceAgents => world.advance_agents(out_events),
        Command::PlaceFood { cell } => {
            if world.is_walkable(cell) {
                world.food = Some(cell);
                out_events.push(Event::FoodPlaced { cell });
            } else {
                out_events.push(Event::FoodPlacementRejected { cell });
            }
        }
        Command::RestartRound => {
            for snake in &mut world.snakes {
                snake.restate();
            }
            world.food = None;
            out_events.push(Event::RoundRestarted);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use snake_hunt_core::{
        AgentBody, AgentId, AgentSnapshot, AgentView, ArenaLayout, Cell, ConfigError, GridBounds,
        Occupancy,
    };

    use super::{Snake, WallLayout, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Bounds of the configured arena.
    pub fn bounds(world: &World) -> Result<GridBounds, ConfigError> {
        world
            .layout
            .as_ref()
            .map(|layout| layout.bounds)
            .ok_or(ConfigError::BoundsUninitialized)
    }

    /// Layout the arena was configured with, if any.
    #[must_use]
    pub fn layout(world: &World) -> Option<&ArenaLayout> {
        world.layout.as_ref()
    }

    /// Provides read-only access to the static walls.
    #[must_use]
    pub fn walls(world: &World) -> &WallLayout {
        &world.walls
    }

    /// Body of the provided agent, if the arena was configured.
    #[must_use]
    pub fn snake(world: &World, agent: AgentId) -> Option<&Snake> {
        world.snakes.iter().find(|snake| snake.id() == agent)
    }

    /// Captures a read-only view of the agents inhabiting the arena.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        let snapshots = world
            .snakes
            .iter()
            .map(|snake| AgentSnapshot {
                id: snake.id(),
                head: snake.head(),
                length: snake.length(),
                heading: snake.heading(),
                ready_for_step: snake.ready_for_step(),
                accumulated: snake.accumulated(),
            })
            .collect();
        AgentView::from_snapshots(snapshots)
    }

    /// Cell currently holding the food, if any.
    #[must_use]
    pub fn food(world: &World) -> Option<Cell> {
        world.food
    }

    /// Number of ticks processed since the arena was configured.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the composite occupancy of walls and both bodies.
    #[must_use]
    pub fn occupancy(world: &World) -> Option<Occupancy<'_>> {
        let layout = world.layout.as_ref()?;
        let bodies: Vec<&dyn AgentBody> = world
            .snakes
            .iter()
            .map(|snake| snake as &dyn AgentBody)
            .collect();
        Some(Occupancy::new(layout.bounds, &world.walls, bodies))
    }

    /// Enumerates every walkable cell in row-major order.
    #[must_use]
    pub fn free_cells(world: &World) -> Vec<Cell> {
        match &world.layout {
            Some(layout) => layout
                .bounds
                .cells()
                .filter(|cell| world.is_walkable(*cell))
                .collect(),
            None => Vec::new(),
        }
    }
}
