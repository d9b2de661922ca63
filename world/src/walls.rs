//! Static wall geometry backing occupancy and line-of-sight queries.

use std::collections::HashSet;

use snake_hunt_core::{Cell, WallMap};

/// Set of cells covered by walls.
#[derive(Clone, Debug, Default)]
pub struct WallLayout {
    cells: HashSet<Cell>,
}

impl WallLayout {
    pub(crate) fn from_cells(cells: &[Cell]) -> Self {
        Self {
            cells: cells.iter().copied().collect(),
        }
    }

    /// Number of walled cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the arena has no walls at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Walled cells in ascending order.
    #[must_use]
    pub fn sorted_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.cells.iter().copied().collect();
        cells.sort_unstable();
        cells
    }
}

impl WallMap for WallLayout {
    fn is_wall_at(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }
}
