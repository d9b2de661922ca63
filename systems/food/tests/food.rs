use std::time::Duration;

use snake_hunt_core::{AgentId, ArenaLayout, Cell, Command, Event, GridBounds};
use snake_hunt_system_food::{Config, FoodSpawner};
use snake_hunt_world::{self as world, query, World};

fn pump(world: &mut World, spawner: &mut FoodSpawner, events: &[Event]) -> Vec<Event> {
    let free_cells = query::free_cells(world);
    let mut commands = Vec::new();
    spawner.handle(events, &free_cells, query::food(world), &mut commands);

    let mut generated = Vec::new();
    for command in commands {
        world::apply(world, command, &mut generated);
    }
    generated
}

fn configured(width: i32, height: i32, walls: Vec<Cell>) -> (World, Vec<Event>) {
    let mut world = World::new();
    let mut events = Vec::new();
    let mut layout = ArenaLayout::open(GridBounds::new(0, width, 0, height).expect("bounds"));
    layout.walls = walls;
    world::apply(&mut world, Command::ConfigureArena { layout }, &mut events);
    (world, events)
}

#[test]
fn configuring_the_arena_places_food_on_a_free_cell() {
    let (mut world, events) = configured(6, 6, vec![Cell::new(3, 3)]);
    let mut spawner = FoodSpawner::new(Config::new(21));

    let placed = pump(&mut world, &mut spawner, &events);

    let food = query::food(&world).expect("food placed");
    assert_eq!(placed, vec![Event::FoodPlaced { cell: food }]);
    assert_ne!(food, Cell::new(3, 3));
    assert_ne!(food, Cell::new(0, 0));
    assert_ne!(food, Cell::new(0, 5));
}

#[test]
fn eaten_food_is_replaced() {
    let (mut world, mut events) = configured(4, 4, Vec::new());
    world::apply(
        &mut world,
        Command::PlaceFood {
            cell: Cell::new(1, 0),
        },
        &mut events,
    );

    let mut step = Vec::new();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
        &mut step,
    );
    world::apply(&mut world, Command::AdvanceAgents, &mut step);
    assert!(step.contains(&Event::FoodEaten {
        agent: AgentId::Player,
        cell: Cell::new(1, 0),
    }));

    let mut spawner = FoodSpawner::new(Config::new(4));
    let placed = pump(&mut world, &mut spawner, &step);

    assert_eq!(placed.len(), 1);
    let food = query::food(&world).expect("replacement food");
    assert!(query::free_cells(&world).contains(&food));
}

#[test]
fn identical_seeds_choose_identical_cells() {
    let (mut first, events) = configured(8, 8, Vec::new());
    let (mut second, _) = configured(8, 8, Vec::new());

    let mut a = FoodSpawner::new(Config::new(99));
    let mut b = FoodSpawner::new(Config::new(99));
    let _ = pump(&mut first, &mut a, &events);
    let _ = pump(&mut second, &mut b, &events);

    assert_eq!(query::food(&first), query::food(&second));
}
