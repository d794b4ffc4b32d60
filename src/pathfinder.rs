use glam::Vec2;
use log::{debug, trace};
use pathfinding::prelude::bfs_reach;

use crate::algorithms::a_star::AStar;
use crate::algorithms::common::SearchOutcome;
use crate::algorithms::optimizer::PathOptimizer;
use crate::config::PathfinderConfig;
use crate::error::ConfigError;
use crate::grid::{GridCoord, GridStore};
use crate::obstacles::ObstacleQuery;
use crate::scratch::ScratchPool;
use crate::statistics::PathfinderStats;

/// Answers agent path queries against a [`GridStore`].
///
/// The engine owns its scratch pool and optimizer; the grid and the obstacle
/// oracle are borrowed per call so several grids can share one engine.
#[derive(Debug)]
pub struct Pathfinder {
    config: PathfinderConfig,
    astar: AStar,
    optimizer: PathOptimizer,
    pool: ScratchPool,
    stats: PathfinderStats,
}

impl Pathfinder {
    pub fn new(config: PathfinderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Pathfinder {
            astar: AStar::new(
                config.diagonal_factor,
                config.max_iterations,
                config.max_path_length,
            ),
            optimizer: PathOptimizer::new(config.clearance()),
            pool: ScratchPool::new(config.scratch_pool_size, config.max_path_length),
            stats: PathfinderStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    pub fn stats(&self) -> &PathfinderStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = PathfinderStats::default();
    }

    pub fn pool(&self) -> &ScratchPool {
        &self.pool
    }

    /// Path from `start` to `target`, never empty.
    ///
    /// Close, mutually visible endpoints are joined directly. Otherwise the
    /// endpoints are resolved to walkable nodes and searched; the raw path has
    /// its ends pinned to the exact query points and is then simplified. When
    /// resolution or the search fails the result is the straight line
    /// `[start, target]`, which may cross obstacles.
    ///
    /// Only legs between node centers are known to be clear. The first and
    /// last legs join the exact query points to their neighbouring waypoints
    /// and are kept even when an obstacle lies across them.
    pub fn find_path<Q>(
        &mut self,
        grid: &GridStore,
        obstacles: &Q,
        start: Vec2,
        target: Vec2,
    ) -> Vec<Vec2>
    where
        Q: ObstacleQuery + ?Sized,
    {
        self.stats.queries += 1;

        if start.distance(target) < self.config.shortcut_distance()
            && !obstacles.is_segment_blocked(start, target)
        {
            self.stats.shortcuts += 1;
            return vec![start, target];
        }

        let (Some(from), Some(to)) = (self.resolve(grid, start), self.resolve(grid, target))
        else {
            debug!(
                "no walkable node near ({:.2}, {:.2}) -> ({:.2}, {:.2}), using straight line",
                start.x, start.y, target.x, target.y
            );
            self.stats.unresolved += 1;
            self.stats.fallbacks += 1;
            return vec![start, target];
        };

        let Some(mut raw) = self.search(grid, from, to) else {
            self.stats.fallbacks += 1;
            return vec![start, target];
        };

        if raw.len() < 2 {
            return vec![start, target];
        }
        let last = raw.len() - 1;
        raw[0] = start;
        raw[last] = target;

        let path = self.optimizer.optimize(&raw, obstacles);
        self.stats.raw_waypoints += raw.len();
        self.stats.optimized_waypoints += path.len();
        path
    }

    /// Walkable node standing in for `point`, if one is close enough.
    pub fn resolve(&self, grid: &GridStore, point: Vec2) -> Option<GridCoord> {
        let coord = grid.world_to_coord(grid.clamp_to_bounds(point));
        let node = grid.node(coord)?;
        if node.walkable {
            return Some(coord);
        }
        bfs_reach(coord, |c| grid.neighbors(*c).map(|n| n.coord))
            .take(self.config.max_resolve_expansion)
            .find(|c| grid.is_walkable(*c))
    }

    fn search(&mut self, grid: &GridStore, from: GridCoord, to: GridCoord) -> Option<Vec<Vec2>> {
        let mut scratch = self.pool.acquire();
        let outcome = self.astar.search(grid, from, to, &mut scratch);

        self.stats.searches += 1;
        self.stats.iterations += outcome.iterations();
        match outcome {
            SearchOutcome::Found { .. } => self.stats.found += 1,
            SearchOutcome::Exhausted { .. } => self.stats.exhausted += 1,
            SearchOutcome::CapReached { .. } => self.stats.cap_reached += 1,
            SearchOutcome::PathTooLong { .. } => self.stats.too_long += 1,
        }

        if !outcome.is_found() {
            debug!("search {:?} -> {:?} failed: {:?}", from, to, outcome);
            return None;
        }
        trace!(
            "search {:?} -> {:?}: {} nodes",
            from,
            to,
            scratch.path.len()
        );
        let waypoints = scratch.path.iter().map(|c| grid.coord_to_world(*c));
        Some(waypoints.collect())
    }
}
