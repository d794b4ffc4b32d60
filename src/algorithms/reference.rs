use pathfinding::prelude::astar;

use crate::algorithms::common::{octile_distance, walkable_successors};
use crate::grid::{GridCoord, GridStore};

// Fixed-point scale so costs satisfy the crate's `Ord` bound.
const COST_SCALE: f32 = 1000.0;

/// Uncapped optimal A* using the `pathfinding` crate, same neighbour rules as
/// the engine. Used to judge route efficiency, not to answer agent queries.
///
/// Returns the coordinates from start to goal and the path cost in grid units.
pub fn reference_path(
    grid: &GridStore,
    start: GridCoord,
    goal: GridCoord,
    diagonal_factor: f32,
) -> Option<(Vec<GridCoord>, f32)> {
    if !grid.is_walkable(start) || !grid.is_walkable(goal) {
        return None;
    }
    let result = astar(
        &start,
        |c| {
            walkable_successors(grid, *c, diagonal_factor)
                .map(|(next, step)| (next, (step * COST_SCALE).round() as u32))
                .collect::<Vec<_>>()
        },
        // Rounded down so the estimate never exceeds the scaled step costs.
        |c| (octile_distance(*c, goal, diagonal_factor) * COST_SCALE).floor() as u32,
        |c| *c == goal,
    );
    result.map(|(path, cost)| (path, cost as f32 / COST_SCALE))
}
