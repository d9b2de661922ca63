#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Snake Hunt session.

use snake_hunt_core::{ArenaLayout, ConfigError, GridBounds};
use snake_hunt_world::{query, World};

/// Produces data required to greet the player and validate startup state.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the session starts.
    #[must_use]
    pub fn welcome_banner(&self, world: &World) -> &'static str {
        query::welcome_banner(world)
    }

    /// Checks a layout before it is handed to the world.
    pub fn validate_layout(&self, layout: &ArenaLayout) -> Result<(), ConfigError> {
        layout.validate()
    }

    /// Exposes the arena bounds, failing when no arena was ever configured.
    pub fn bounds(&self, world: &World) -> Result<GridBounds, ConfigError> {
        query::bounds(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_hunt_core::{Cell, Command, WELCOME_BANNER};
    use snake_hunt_world::apply;

    #[test]
    fn greets_with_the_canonical_banner() {
        let world = World::new();
        assert_eq!(Bootstrap.welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn reports_missing_bounds_until_configured() {
        let mut world = World::new();
        assert_eq!(
            Bootstrap.bounds(&world),
            Err(ConfigError::BoundsUninitialized)
        );

        let bounds = GridBounds::new(0, 5, 0, 5).expect("bounds");
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureArena {
                layout: ArenaLayout::open(bounds),
            },
            &mut events,
        );
        assert_eq!(Bootstrap.bounds(&world), Ok(bounds));
    }

    #[test]
    fn rejects_spawns_outside_the_arena() {
        let bounds = GridBounds::new(0, 5, 0, 5).expect("bounds");
        let mut layout = ArenaLayout::open(bounds);
        layout.player_spawn = Cell::new(5, 0);
        assert!(matches!(
            Bootstrap.validate_layout(&layout),
            Err(ConfigError::SpawnBlocked { .. })
        ));
    }
}
