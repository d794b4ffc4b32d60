use glam::Vec2;

use crate::grid::GridStore;

/// A chasing unit driven by the simulation. Steering is a plain walk along the
/// waypoints it was handed.
#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Vec2,
    pub speed: f32,
    pub collision_enabled: bool,
    path: Vec<Vec2>,
    next_waypoint: usize,
    frames_since_plan: usize,
}

impl Agent {
    pub fn new(position: Vec2, speed: f32) -> Self {
        Agent {
            position,
            speed,
            collision_enabled: false,
            path: Vec::new(),
            next_waypoint: 0,
            frames_since_plan: 0,
        }
    }

    /// Agents outside the node window stop taking part in collisions and
    /// pathfinding until the window reaches them again.
    pub fn update_collision(&mut self, grid: &GridStore) -> bool {
        self.collision_enabled = grid.is_position_in_grid(self.position);
        if !self.collision_enabled {
            self.clear_path();
        }
        self.collision_enabled
    }

    pub fn needs_path(&self, replan_interval: usize) -> bool {
        self.next_waypoint >= self.path.len() || self.frames_since_plan >= replan_interval
    }

    pub fn set_path(&mut self, path: Vec<Vec2>) {
        // The first waypoint is where we already stand.
        self.next_waypoint = path.len().min(1);
        self.path = path;
        self.frames_since_plan = 0;
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
        self.next_waypoint = 0;
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    /// Walks up to `speed` along the remaining waypoints; true once the last one is reached.
    pub fn advance(&mut self) -> bool {
        self.frames_since_plan += 1;
        let mut budget = self.speed;
        while let Some(&waypoint) = self.path.get(self.next_waypoint) {
            let to_go = waypoint - self.position;
            let dist = to_go.length();
            if dist > budget {
                self.position += to_go / dist * budget;
                return false;
            }
            self.position = waypoint;
            budget -= dist;
            self.next_waypoint += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathfinderConfig;
    use crate::obstacles::ObstacleField;
    use approx::assert_relative_eq;

    #[test]
    fn walks_along_waypoints() {
        let mut agent = Agent::new(Vec2::ZERO, 1.5);
        agent.set_path(vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 2.0)]);

        assert!(!agent.advance());
        assert_relative_eq!(agent.position.x, 1.0);
        assert_relative_eq!(agent.position.y, 0.5);

        assert!(agent.advance());
        assert_eq!(agent.position, Vec2::new(1.0, 2.0));
        assert!(agent.needs_path(100));
    }

    #[test]
    fn replans_after_interval() {
        let mut agent = Agent::new(Vec2::ZERO, 0.1);
        agent.set_path(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]);
        assert!(!agent.needs_path(3));
        for _ in 0..3 {
            agent.advance();
        }
        assert!(agent.needs_path(3));
    }

    #[test]
    fn collision_follows_grid_visibility() {
        let mut grid = GridStore::new(&PathfinderConfig::default());
        grid.ensure_region(Vec2::ZERO, Vec2::splat(4.0), &ObstacleField::new());

        let mut inside = Agent::new(Vec2::new(1.0, 1.0), 1.0);
        assert!(inside.update_collision(&grid));

        let mut outside = Agent::new(Vec2::new(50.0, 0.0), 1.0);
        outside.set_path(vec![Vec2::new(50.0, 0.0), Vec2::new(40.0, 0.0)]);
        assert!(!outside.update_collision(&grid));
        assert!(!outside.collision_enabled);
        assert!(outside.path().is_empty());
    }
}
