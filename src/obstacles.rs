use glam::Vec2;

/// Occupancy oracle consumed by the grid store, the engine and the optimizer.
///
/// Answers must be deterministic for the duration of a frame.
pub trait ObstacleQuery {
    /// True if a disc of `radius` around `point` overlaps anything solid.
    fn is_point_blocked(&self, point: Vec2, radius: f32) -> bool;

    /// True if the segment `from -> to` touches anything solid.
    fn is_segment_blocked(&self, from: Vec2, to: Vec2) -> bool;
}

impl<T: ObstacleQuery + ?Sized> ObstacleQuery for &T {
    fn is_point_blocked(&self, point: Vec2, radius: f32) -> bool {
        (**self).is_point_blocked(point, radius)
    }

    fn is_segment_blocked(&self, from: Vec2, to: Vec2) -> bool {
        (**self).is_segment_blocked(from, to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    Circle { center: Vec2, radius: f32 },
    /// Axis-aligned box given by its corners.
    Rect { min: Vec2, max: Vec2 },
}

impl Obstacle {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Obstacle::Circle { center, radius }
    }

    pub fn rect(a: Vec2, b: Vec2) -> Self {
        Obstacle::Rect {
            min: a.min(b),
            max: a.max(b),
        }
    }

    fn overlaps_disc(&self, point: Vec2, radius: f32) -> bool {
        match *self {
            Obstacle::Circle { center, radius: r } => point.distance(center) <= r + radius,
            Obstacle::Rect { min, max } => point.clamp(min, max).distance(point) <= radius,
        }
    }

    fn intersects_segment(&self, from: Vec2, to: Vec2) -> bool {
        match *self {
            Obstacle::Circle { center, radius } => {
                distance_to_segment(center, from, to) <= radius
            }
            Obstacle::Rect { min, max } => segment_hits_box(from, to, min, max),
        }
    }
}

/// A static set of solid shapes.
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obstacles(obstacles: Vec<Obstacle>) -> Self {
        ObstacleField { obstacles }
    }

    pub fn add(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl ObstacleQuery for ObstacleField {
    fn is_point_blocked(&self, point: Vec2, radius: f32) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.overlaps_disc(point, radius))
    }

    fn is_segment_blocked(&self, from: Vec2, to: Vec2) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.intersects_segment(from, to))
    }
}

fn distance_to_segment(point: Vec2, from: Vec2, to: Vec2) -> f32 {
    let seg = to - from;
    let len_sq = seg.length_squared();
    if len_sq == 0.0 {
        return point.distance(from);
    }
    let t = ((point - from).dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(from + seg * t)
}

// Slab test against the box, clipped to the segment's [0, 1] parameter range.
fn segment_hits_box(from: Vec2, to: Vec2, min: Vec2, max: Vec2) -> bool {
    let dir = to - from;
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    for axis in 0..2 {
        let (origin, d, lo, hi) = (from[axis], dir[axis], min[axis], max[axis]);
        if d.abs() < f32::EPSILON {
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return false;
        }
    }
    true
}
