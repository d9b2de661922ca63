//! Headless host loop that drives the world and its systems tick by tick.

use std::time::Duration;

use snake_hunt_core::{
    AgentId, AgentState, AiMode, ArenaLayout, Command, Event, OccupancyOracle,
};
use snake_hunt_system_decision::{Config as DecisionConfig, Decision, Surroundings};
use snake_hunt_system_food::{Config as FoodConfig, FoodSpawner};
use snake_hunt_system_vision::LineOfSight;
use snake_hunt_world::{self as world, query, World};
use tracing::{debug, info};

/// Parameters chosen by the host for a simulation run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Settings {
    pub(crate) tick: Duration,
    pub(crate) opponent_mode: AiMode,
    pub(crate) vision_range: u32,
    pub(crate) seed: u64,
}

/// Totals gathered while the simulation ran.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) rounds_restarted: u32,
    pub(crate) player_meals: u32,
    pub(crate) opponent_meals: u32,
    pub(crate) collisions: u32,
}

/// Owns the world together with every system reacting to it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    opponent: Decision,
    autopilot: Decision,
    food: FoodSpawner,
    tick: Duration,
    summary: Summary,
}

impl Simulation {
    /// Configures the arena and places the first food.
    pub(crate) fn new(layout: ArenaLayout, settings: Settings) -> Self {
        let mut simulation = Self {
            world: World::new(),
            opponent: Decision::new(
                AgentId::Opponent,
                DecisionConfig::new(settings.opponent_mode, settings.vision_range, settings.seed),
            ),
            autopilot: Decision::new(
                AgentId::Player,
                DecisionConfig::new(
                    AiMode::FoodChaser,
                    settings.vision_range,
                    settings.seed.wrapping_add(1),
                ),
            ),
            food: FoodSpawner::new(FoodConfig::new(settings.seed.wrapping_add(2))),
            tick: settings.tick,
            summary: Summary::default(),
        };

        let mut events = Vec::new();
        world::apply(
            &mut simulation.world,
            Command::ConfigureArena { layout },
            &mut events,
        );
        simulation.pump(events);
        simulation
    }

    /// Totals gathered so far.
    pub(crate) fn summary(&self) -> Summary {
        self.summary
    }

    /// Advances the simulation by one tick.
    ///
    /// Steering for the tick resolves completely before any snake moves.
    pub(crate) fn step(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt: self.tick }, &mut events);
        self.summary.ticks += 1;
        self.pump(events);

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::AdvanceAgents, &mut events);
        let player_crashed = events.iter().any(|event| {
            matches!(
                event,
                Event::AgentCollided {
                    agent: AgentId::Player,
                    ..
                }
            )
        });
        if player_crashed {
            world::apply(&mut self.world, Command::RestartRound, &mut events);
        }
        self.pump(events);
    }

    /// Current behavioural state of the opponent.
    pub(crate) fn opponent_state(&self) -> AgentState {
        self.opponent.state()
    }

    /// Read-only access to the simulated world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    fn pump(&mut self, mut events: Vec<Event>) {
        while !events.is_empty() {
            self.record(&events);
            let commands = self.react(&events);
            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn react(&mut self, events: &[Event]) -> Vec<Command> {
        let world = &self.world;
        let occupancy = query::occupancy(world);
        let walls = query::walls(world);
        let sight = LineOfSight::new(walls);
        let surroundings = Surroundings {
            bounds: query::bounds(world).ok(),
            occupancy: occupancy
                .as_ref()
                .map(|occupancy| occupancy as &dyn OccupancyOracle),
            walls: Some(walls),
            sight: Some(&sight),
            food: query::food(world),
        };
        let agents = query::agent_view(world);

        let mut commands = Vec::new();
        self.opponent
            .handle(events, &agents, &surroundings, &mut commands);
        self.autopilot
            .handle(events, &agents, &surroundings, &mut commands);
        self.food.handle(
            events,
            &query::free_cells(world),
            query::food(world),
            &mut commands,
        );
        commands
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::AgentCollided { agent, cell } => {
                    debug!(?agent, ?cell, "collision");
                    self.summary.collisions += 1;
                }
                Event::FoodEaten { agent, cell } => {
                    info!(?agent, ?cell, "food eaten");
                    match agent {
                        AgentId::Player => self.summary.player_meals += 1,
                        AgentId::Opponent => self.summary.opponent_meals += 1,
                    }
                }
                Event::RoundRestarted => {
                    info!(tick = self.summary.ticks, "round restarted");
                    self.summary.rounds_restarted += 1;
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_hunt_core::{Cell, GridBounds};
    use snake_hunt_system_decision::DEFAULT_VISION_RANGE;

    fn settings(seed: u64) -> Settings {
        Settings {
            tick: Duration::from_millis(20),
            opponent_mode: AiMode::OpponentChaser,
            vision_range: DEFAULT_VISION_RANGE,
            seed,
        }
    }

    #[test]
    fn first_food_is_placed_on_startup() {
        let layout = ArenaLayout::open(GridBounds::new(0, 8, 0, 8).expect("bounds"));
        let simulation = Simulation::new(layout, settings(0));
        assert!(query::food(simulation.world()).is_some());
    }

    #[test]
    fn identical_settings_produce_identical_runs() {
        let layout = ArenaLayout::open(GridBounds::new(0, 12, 0, 12).expect("bounds"));
        let mut first = Simulation::new(layout.clone(), settings(8));
        let mut second = Simulation::new(layout, settings(8));
        for _ in 0..300 {
            first.step();
            second.step();
        }

        let first = first.summary();
        assert_eq!(first, second.summary());
        assert_eq!(first.ticks, 300);
    }

    #[test]
    fn boxed_in_player_restarts_the_round() {
        let mut layout = ArenaLayout::open(GridBounds::new(0, 5, 0, 5).expect("bounds"));
        layout.walls = vec![Cell::new(1, 0), Cell::new(0, 1)];
        let mut simulation = Simulation::new(layout, settings(3));

        for _ in 0..10 {
            simulation.step();
        }

        assert!(simulation.summary().rounds_restarted >= 1);
        assert!(simulation.summary().collisions >= 1);
        let player = query::snake(simulation.world(), AgentId::Player).expect("player");
        assert_eq!(player.head(), Cell::new(0, 0));
    }

    #[test]
    fn opponent_chases_a_visible_player() {
        let layout = ArenaLayout::open(GridBounds::new(0, 6, 0, 6).expect("bounds"));
        let mut simulation = Simulation::new(layout, settings(1));
        for _ in 0..5 {
            simulation.step();
        }
        assert_eq!(simulation.opponent_state(), AgentState::Chase);
    }
}
