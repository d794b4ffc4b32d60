use log::trace;

use crate::algorithms::common::{octile_distance, walkable_successors, SearchOutcome};
use crate::grid::{GridCoord, GridStore};
use crate::scratch::{ScratchRecord, SearchScratch};

/// A* over the grid store with a linear-scan open list and an iteration cap.
#[derive(Debug, Clone, Copy)]
pub struct AStar {
    pub diagonal_factor: f32,
    pub max_iterations: usize,
    pub max_path_length: usize,
}

impl AStar {
    pub fn new(diagonal_factor: f32, max_iterations: usize, max_path_length: usize) -> Self {
        AStar {
            diagonal_factor,
            max_iterations,
            max_path_length,
        }
    }

    /// Searches from `start` to `goal`, both expected to be walkable nodes.
    ///
    /// `scratch` must come in cleared. On success its `path` buffer holds the
    /// coordinates from start to goal inclusive.
    pub fn search(
        &self,
        grid: &GridStore,
        start: GridCoord,
        goal: GridCoord,
        scratch: &mut SearchScratch,
    ) -> SearchOutcome {
        let h = octile_distance(start, goal, self.diagonal_factor);
        scratch.records.insert(start, ScratchRecord::new(0.0, h, None));
        scratch.open.push(start);

        let mut iterations = 0;
        let outcome = loop {
            if scratch.open.is_empty() {
                break SearchOutcome::Exhausted { iterations };
            }
            if iterations >= self.max_iterations {
                break SearchOutcome::CapReached { iterations };
            }
            iterations += 1;

            let current = scratch.open.remove(lowest_f_index(scratch));
            if current == goal {
                break self.reconstruct(scratch, goal, iterations);
            }
            scratch.closed.insert(current);

            let current_g = scratch.g(current);
            for (next, step) in walkable_successors(grid, current, self.diagonal_factor) {
                if scratch.closed.contains(&next) {
                    continue;
                }
                let tentative = current_g + step;
                match scratch.records.get_mut(&next) {
                    Some(record) => {
                        if tentative < record.g {
                            record.set_g(tentative, Some(current));
                        }
                    }
                    None => {
                        let h = octile_distance(next, goal, self.diagonal_factor);
                        let record = ScratchRecord::new(tentative, h, Some(current));
                        scratch.records.insert(next, record);
                        scratch.open.push(next);
                    }
                }
            }
        };

        trace!(
            "a* {:?} -> {:?}: {:?}, {} records",
            start,
            goal,
            outcome,
            scratch.records.len()
        );
        outcome
    }

    fn reconstruct(
        &self,
        scratch: &mut SearchScratch,
        goal: GridCoord,
        iterations: usize,
    ) -> SearchOutcome {
        scratch.path.clear();
        let mut cursor = Some(goal);
        while let Some(coord) = cursor {
            if scratch.path.len() == self.max_path_length {
                scratch.path.clear();
                return SearchOutcome::PathTooLong { iterations };
            }
            scratch.path.push(coord);
            cursor = scratch.record(coord).and_then(|r| r.parent);
        }
        scratch.path.reverse();
        SearchOutcome::Found { iterations }
    }
}

// First entry with the minimum f wins; no secondary tie-break.
fn lowest_f_index(scratch: &SearchScratch) -> usize {
    let mut best = 0;
    let mut best_f = f32::INFINITY;
    for (i, coord) in scratch.open.iter().enumerate() {
        let f = scratch.record(*coord).map_or(f32::INFINITY, |r| r.f);
        if f < best_f {
            best = i;
            best_f = f;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathfinderConfig;
    use crate::obstacles::{Obstacle, ObstacleField};
    use crate::scratch::ScratchPool;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn grid_with(field: &ObstacleField, half: f32) -> GridStore {
        let mut grid = GridStore::new(&PathfinderConfig::default());
        grid.ensure_region(Vec2::ZERO, Vec2::splat(half), field);
        grid
    }

    #[test]
    fn straight_line_on_open_grid() {
        let grid = grid_with(&ObstacleField::new(), 10.0);
        let mut pool = ScratchPool::new(1, 64);
        let mut scratch = pool.acquire();
        let astar = AStar::new(1.4, 1000, 64);

        let (start, goal) = (GridCoord::new(-5, 0), GridCoord::new(5, 0));
        let outcome = astar.search(&grid, start, goal, &mut scratch);
        assert!(outcome.is_found());
        assert_eq!(scratch.path.len(), 11);
        assert_eq!(scratch.path[0], start);
        assert_eq!(scratch.path[10], goal);
        assert_relative_eq!(scratch.g(goal), 10.0);

        let goal_record = scratch.record(goal).unwrap();
        assert_eq!(goal_record.parent, Some(GridCoord::new(4, 0)));
        assert_relative_eq!(goal_record.f, goal_record.g);
        assert!(scratch.record(start).unwrap().parent.is_none());
    }

    #[test]
    fn diagonal_cost_is_octile() {
        let grid = grid_with(&ObstacleField::new(), 10.0);
        let mut pool = ScratchPool::new(1, 64);
        let mut scratch = pool.acquire();
        let astar = AStar::new(1.4, 1000, 64);

        let goal = GridCoord::new(4, 2);
        let outcome = astar.search(&grid, GridCoord::new(0, 0), goal, &mut scratch);
        assert!(outcome.is_found());
        assert_eq!(scratch.path.len(), 5);
        assert_relative_eq!(scratch.g(goal), 2.0 + 2.0 * 1.4, epsilon = 1e-5);
    }

    #[test]
    fn routes_around_a_wall() {
        let field = ObstacleField::with_obstacles(vec![Obstacle::rect(
            Vec2::new(-0.2, -4.2),
            Vec2::new(0.2, 4.2),
        )]);
        let grid = grid_with(&field, 10.0);
        let mut pool = ScratchPool::new(1, 128);
        let mut scratch = pool.acquire();
        let astar = AStar::new(1.4, 10_000, 128);

        let (start, goal) = (GridCoord::new(-3, 0), GridCoord::new(3, 0));
        let outcome = astar.search(&grid, start, goal, &mut scratch);
        assert!(outcome.is_found());
        assert!(scratch.path.iter().all(|c| grid.is_walkable(*c)));
        assert!(scratch.path.iter().any(|c| c.y.abs() >= 5));
        for pair in scratch.path.windows(2) {
            let (dx, dy) = (pair[0].x - pair[1].x, pair[0].y - pair[1].y);
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
        }
    }

    #[test]
    fn enclosed_goal_exhausts() {
        // Ring of blocked nodes around (0, 0) with the center left open.
        let mut field = ObstacleField::new();
        for c in GridCoord::new(0, 0).neighbors_8() {
            field.add(Obstacle::circle(Vec2::new(c.x as f32, c.y as f32), 0.1));
        }
        let grid = grid_with(&field, 6.0);
        let mut pool = ScratchPool::new(1, 64);
        let mut scratch = pool.acquire();
        let astar = AStar::new(1.4, 10_000, 64);

        let (start, goal) = (GridCoord::new(-4, -4), GridCoord::new(0, 0));
        let outcome = astar.search(&grid, start, goal, &mut scratch);
        assert!(matches!(outcome, SearchOutcome::Exhausted { .. }));
        assert!(scratch.path.is_empty());
    }

    #[test]
    fn iteration_cap_stops_the_search() {
        let grid = grid_with(&ObstacleField::new(), 10.0);
        let mut pool = ScratchPool::new(1, 64);
        let mut scratch = pool.acquire();
        let astar = AStar::new(1.4, 3, 64);

        let (start, goal) = (GridCoord::new(-8, 0), GridCoord::new(8, 0));
        let outcome = astar.search(&grid, start, goal, &mut scratch);
        assert_eq!(outcome, SearchOutcome::CapReached { iterations: 3 });
    }

    #[test]
    fn overlong_path_is_rejected() {
        let grid = grid_with(&ObstacleField::new(), 10.0);
        let mut pool = ScratchPool::new(1, 4);
        let mut scratch = pool.acquire();
        let astar = AStar::new(1.4, 1000, 4);

        let (start, goal) = (GridCoord::new(-8, 0), GridCoord::new(8, 0));
        let outcome = astar.search(&grid, start, goal, &mut scratch);
        assert!(matches!(outcome, SearchOutcome::PathTooLong { .. }));
        assert!(scratch.path.is_empty());
    }

    #[test]
    fn same_start_and_goal() {
        let grid = grid_with(&ObstacleField::new(), 4.0);
        let mut pool = ScratchPool::new(1, 8);
        let mut scratch = pool.acquire();
        let astar = AStar::new(1.4, 10, 8);

        let c = GridCoord::new(1, 1);
        let outcome = astar.search(&grid, c, c, &mut scratch);
        assert_eq!(outcome, SearchOutcome::Found { iterations: 1 });
        assert_eq!(scratch.path, vec![c]);
    }
}
