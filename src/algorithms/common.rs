use crate::grid::{GridCoord, GridStore};

/// Octile distance: `(dx + dy) + (diagonal_factor - 2) * min(dx, dy)`.
pub fn octile_distance(a: GridCoord, b: GridCoord, diagonal_factor: f32) -> f32 {
    let dx = (a.x - b.x).unsigned_abs() as f32;
    let dy = (a.y - b.y).unsigned_abs() as f32;
    (dx + dy) + (diagonal_factor - 2.0) * dx.min(dy)
}

/// How a grid search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Path written to the scratch path buffer, start first.
    Found { iterations: usize },
    /// Open list ran dry before the goal was popped.
    Exhausted { iterations: usize },
    /// Iteration cap hit.
    CapReached { iterations: usize },
    /// Goal reached but the path does not fit the output buffer.
    PathTooLong { iterations: usize },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn iterations(&self) -> usize {
        match *self {
            SearchOutcome::Found { iterations }
            | SearchOutcome::Exhausted { iterations }
            | SearchOutcome::CapReached { iterations }
            | SearchOutcome::PathTooLong { iterations } => iterations,
        }
    }
}

/// Walkable neighbours of `coord` paired with their step cost.
///
/// A diagonal step is only offered when both orthogonal nodes it squeezes
/// between are walkable.
pub fn walkable_successors(
    grid: &GridStore,
    coord: GridCoord,
    diagonal_factor: f32,
) -> impl Iterator<Item = (GridCoord, f32)> + '_ {
    coord.neighbors_8().into_iter().filter_map(move |next| {
        if !grid.is_walkable(next) {
            return None;
        }
        let dx = next.x - coord.x;
        let dy = next.y - coord.y;
        if dx != 0 && dy != 0 {
            let side_a = coord.offset(dx, 0);
            let side_b = coord.offset(0, dy);
            if !grid.is_walkable(side_a) || !grid.is_walkable(side_b) {
                return None;
            }
            Some((next, diagonal_factor))
        } else {
            Some((next, 1.0))
        }
    })
}
