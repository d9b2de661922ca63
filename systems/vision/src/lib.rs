#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Line-of-sight checks that gate the opponent's chase state.

use snake_hunt_core::{Cell, Sight, WallMap};
use tracing::trace;

/// Reports whether `target` is visible from `origin`.
///
/// Targets farther than `range` Manhattan steps are never visible; the wall
/// raycast only runs once the distance check passes.
#[must_use]
pub fn can_see<W>(origin: Cell, target: Cell, range: u32, walls: &W) -> bool
where
    W: WallMap + ?Sized,
{
    let distance = origin.manhattan_distance(target);
    if distance > u64::from(range) {
        return false;
    }

    let occluded = walls.raycast_blocked(origin, target);
    trace!(?origin, ?target, distance, occluded, "line of sight");
    !occluded
}

/// [`Sight`] implementation backed by static wall geometry.
#[derive(Clone, Copy)]
pub struct LineOfSight<'a> {
    walls: &'a dyn WallMap,
}

impl<'a> LineOfSight<'a> {
    /// Creates a sight test over the provided walls.
    #[must_use]
    pub fn new(walls: &'a dyn WallMap) -> Self {
        Self { walls }
    }
}

impl std::fmt::Debug for LineOfSight<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineOfSight").finish_non_exhaustive()
    }
}

impl Sight for LineOfSight<'_> {
    fn can_see(&self, origin: Cell, target: Cell, range: u32) -> bool {
        can_see(origin, target, range, self.walls)
    }
}
