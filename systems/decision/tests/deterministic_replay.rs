use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use snake_hunt_core::{
    AgentId, AiMode, ArenaLayout, Cell, Command, Direction, Event, GridBounds, OccupancyOracle,
};
use snake_hunt_system_decision::{Config, Decision, Surroundings};
use snake_hunt_system_vision::LineOfSight;
use snake_hunt_world::{self as world, query, World};

const TICKS: usize = 240;

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(17);
    let second = replay(17);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(
        first
            .events
            .iter()
            .any(|record| matches!(record, EventRecord::Advanced { .. })),
        "expected the snakes to move"
    );
}

#[test]
fn different_seeds_still_replay_consistently() {
    for seed in [1, 2, 3] {
        assert_eq!(replay(seed).fingerprint(), replay(seed).fingerprint());
    }
}

fn replay(seed: u64) -> ReplayOutcome {
    let mut world = World::new();
    let mut log = Vec::new();
    let mut opponent = Decision::new(
        AgentId::Opponent,
        Config::new(AiMode::OpponentChaser, 6, seed),
    );
    let mut player = Decision::new(AgentId::Player, Config::new(AiMode::FoodChaser, 6, seed));

    let bounds = GridBounds::new(0, 16, 0, 12).expect("bounds");
    let mut layout = ArenaLayout::open(bounds);
    layout.walls = (3..13).map(|x| Cell::new(x, 6)).collect();

    let mut events = Vec::new();
    world::apply(&mut world, Command::ConfigureArena { layout }, &mut events);
    world::apply(
        &mut world,
        Command::PlaceFood {
            cell: Cell::new(14, 2),
        },
        &mut events,
    );
    record_events(&events, &mut log);
    let _ = steer(&world, &mut [&mut opponent, &mut player], &events);

    for _ in 0..TICKS {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(20),
            },
            &mut events,
        );
        let commands = steer(&world, &mut [&mut opponent, &mut player], &events);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        world::apply(&mut world, Command::AdvanceAgents, &mut events);
        record_events(&events, &mut log);
    }

    let bodies = AgentId::ALL
        .into_iter()
        .filter_map(|agent| query::snake(&world, agent))
        .map(|snake| snake.segments().collect())
        .collect();

    ReplayOutcome { bodies, events: log }
}

fn steer(world: &World, decisions: &mut [&mut Decision], events: &[Event]) -> Vec<Command> {
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
    for decision in decisions.iter_mut() {
        decision.handle(events, &agents, &surroundings, &mut commands);
    }
    commands
}

fn record_events(events: &[Event], log: &mut Vec<EventRecord>) {
    for event in events {
        let record = match event {
            Event::AgentSteered { agent, direction } => EventRecord::Steered {
                agent: *agent,
                direction: *direction,
            },
            Event::AgentAdvanced { agent, to, .. } => EventRecord::Advanced {
                agent: *agent,
                to: (to.x(), to.y()),
            },
            Event::AgentCollided { agent, cell } => EventRecord::Collided {
                agent: *agent,
                cell: (cell.x(), cell.y()),
            },
            Event::FoodEaten { agent, .. } => EventRecord::Ate { agent: *agent },
            _ => continue,
        };
        log.push(record);
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    bodies: Vec<Vec<Cell>>,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    Steered { agent: AgentId, direction: Direction },
    Advanced { agent: AgentId, to: (i32, i32) },
    Collided { agent: AgentId, cell: (i32, i32) },
    Ate { agent: AgentId },
}
