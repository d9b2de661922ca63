#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic food placement system.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_hunt_core::{Cell, Command, Event};
use tracing::debug;

/// Configuration parameters for the food spawner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that keeps exactly one piece of food in the arena.
#[derive(Debug)]
pub struct FoodSpawner {
    rng: ChaCha8Rng,
}

impl FoodSpawner {
    /// Creates a new food spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the free-cell view to emit food placement commands.
    ///
    /// `free_cells` must list every walkable cell in a stable order; the
    /// world's row-major enumeration satisfies that.
    pub fn handle(
        &mut self,
        events: &[Event],
        free_cells: &[Cell],
        current_food: Option<Cell>,
        out: &mut Vec<Command>,
    ) {
        let replenish = events.iter().any(|event| {
            matches!(
                event,
                Event::ArenaConfigured { .. } | Event::RoundRestarted | Event::FoodEaten { .. }
            )
        });

        if !replenish && current_food.is_some() {
            return;
        }

        if free_cells.is_empty() {
            debug!("no free cell left for food");
            return;
        }

        let cell = free_cells[self.rng.gen_range(0..free_cells.len())];
        debug!(?cell, "placing food");
        out.push(Command::PlaceFood { cell });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(count: i32) -> Vec<Cell> {
        (0..count).map(|x| Cell::new(x, 0)).collect()
    }

    #[test]
    fn holds_off_while_food_is_present() {
        let mut spawner = FoodSpawner::new(Config::new(1));
        let mut commands = Vec::new();
        spawner.handle(&[], &cells(4), Some(Cell::new(0, 0)), &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn places_food_when_missing() {
        let mut spawner = FoodSpawner::new(Config::new(1));
        let mut commands = Vec::new();
        spawner.handle(&[], &cells(4), None, &mut commands);
        assert_eq!(commands.len(), 1);
        assert!(matches!(
            commands[0],
            Command::PlaceFood { cell } if cells(4).contains(&cell)
        ));
    }

    #[test]
    fn eaten_food_is_replaced_once() {
        let mut spawner = FoodSpawner::new(Config::new(5));
        let events = [
            Event::FoodEaten {
                agent: snake_hunt_core::AgentId::Player,
                cell: Cell::new(2, 0),
            },
            Event::RoundRestarted,
        ];
        let mut commands = Vec::new();
        spawner.handle(&events, &cells(4), Some(Cell::new(2, 0)), &mut commands);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn full_arena_places_nothing() {
        let mut spawner = FoodSpawner::new(Config::default());
        let mut commands = Vec::new();
        spawner.handle(&[Event::RoundRestarted], &[], None, &mut commands);
        assert!(commands.is_empty());
    }
}
