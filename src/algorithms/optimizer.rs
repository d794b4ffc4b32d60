use glam::Vec2;

use crate::obstacles::ObstacleQuery;

/// Drops waypoints that can be skipped along a clear, padded straight line.
#[derive(Debug, Clone, Copy)]
pub struct PathOptimizer {
    clearance: f32,
}

impl PathOptimizer {
    /// `clearance` is the sideways offset of the two extra segments tested
    /// next to every shortcut.
    pub fn new(clearance: f32) -> Self {
        PathOptimizer { clearance }
    }

    pub fn clearance(&self) -> f32 {
        self.clearance
    }

    /// Greedy forward scan: from each anchor jump to the furthest waypoint with
    /// a clear line, falling back to the next waypoint.
    ///
    /// The result is a subsequence of `path` with the same first and last points.
    pub fn optimize<Q>(&self, path: &[Vec2], obstacles: &Q) -> Vec<Vec2>
    where
        Q: ObstacleQuery + ?Sized,
    {
        if path.len() <= 2 {
            return path.to_vec();
        }

        let last = path.len() - 1;
        let mut out = Vec::with_capacity(path.len());
        out.push(path[0]);

        let mut anchor = 0;
        while anchor < last {
            let next = ((anchor + 2)..=last)
                .rev()
                .find(|&j| self.is_clear(path[anchor], path[j], obstacles))
                .unwrap_or(anchor + 1);
            out.push(path[next]);
            anchor = next;
        }
        out
    }

    /// The direct segment and both offset segments must be unobstructed.
    pub fn is_clear<Q>(&self, from: Vec2, to: Vec2, obstacles: &Q) -> bool
    where
        Q: ObstacleQuery + ?Sized,
    {
        if obstacles.is_segment_blocked(from, to) {
            return false;
        }
        let dir = to - from;
        if self.clearance <= 0.0 || dir.length_squared() == 0.0 {
            return true;
        }
        let offset = dir.perp().normalize() * self.clearance;
        !obstacles.is_segment_blocked(from + offset, to + offset)
            && !obstacles.is_segment_blocked(from - offset, to - offset)
    }
}
