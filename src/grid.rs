use glam::Vec2;
use log::debug;
use rustc_hash::FxHashMap;

use crate::config::PathfinderConfig;
use crate::error::ConfigError;
use crate::obstacles::ObstacleQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        GridCoord { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        GridCoord {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The eight surrounding coordinates, orthogonal ones first.
    pub fn neighbors_8(self) -> [GridCoord; 8] {
        [
            self.offset(0, 1),
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(1, 1),
            self.offset(1, -1),
            self.offset(-1, 1),
            self.offset(-1, -1),
        ]
    }
}

/// One cell of the tracked window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub coord: GridCoord,
    pub position: Vec2,
    pub walkable: bool,
}

/// Inclusive coordinate rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min: GridCoord,
    pub max: GridCoord,
}

impl GridBounds {
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.y >= self.min.y
            && coord.y <= self.max.y
    }

    pub fn width(&self) -> usize {
        span(self.min.x, self.max.x)
    }

    pub fn height(&self) -> usize {
        span(self.min.y, self.max.y)
    }

    pub fn len(&self) -> usize {
        self.width().saturating_mul(self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn coords(&self) -> impl Iterator<Item = GridCoord> {
        let GridBounds { min, max } = *self;
        (min.y..=max.y)
            .flat_map(move |y| (min.x..=max.x).map(move |x| GridCoord::new(x, y)))
    }
}

// Widened so bounds spanning the whole i32 range cannot overflow.
fn span(min: i32, max: i32) -> usize {
    (i64::from(max) - i64::from(min) + 1).max(0) as usize
}

/// What the caller can currently see, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Viewport {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Viewport {
            center,
            half_extents,
        }
    }
}

/// Node counts touched by one resync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionDelta {
    pub created: usize,
    pub refreshed: usize,
    pub removed: usize,
}

/// Sparse window of nodes kept around a moving viewport.
#[derive(Debug, Clone)]
pub struct GridStore {
    node_size: f32,
    node_radius: f32,
    origin: Vec2,
    view_margin: f32,
    nodes: FxHashMap<GridCoord, Node>,
    bounds: Option<GridBounds>,
    last_center: Option<Vec2>,
    last_half_extents: Option<Vec2>,
}

impl GridStore {
    /// Empty store. `config` is taken as already validated; a zero or
    /// non-finite node size makes every coordinate mapping meaningless.
    /// Use [`GridStore::try_new`] for unchecked input.
    pub fn new(config: &PathfinderConfig) -> Self {
        GridStore {
            node_size: config.node_size,
            node_radius: config.node_radius,
            origin: config.grid_origin,
            view_margin: config.view_margin,
            nodes: FxHashMap::default(),
            bounds: None,
            last_center: None,
            last_half_extents: None,
        }
    }

    pub fn try_new(config: &PathfinderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn node_size(&self) -> f32 {
        self.node_size
    }

    /// Each node owns the cell of width `node_size` centred on its position.
    pub fn world_to_coord(&self, point: Vec2) -> GridCoord {
        let rel = (point - self.origin) / self.node_size;
        GridCoord::new(
            (rel.x + 0.5).floor() as i32,
            (rel.y + 0.5).floor() as i32,
        )
    }

    pub fn coord_to_world(&self, coord: GridCoord) -> Vec2 {
        self.origin + Vec2::new(coord.x as f32, coord.y as f32) * self.node_size
    }

    /// Coordinates covering `center ± (half_extents + view_margin)`.
    pub fn region_bounds(&self, center: Vec2, half_extents: Vec2) -> GridBounds {
        let reach = half_extents.abs() + Vec2::splat(self.view_margin);
        GridBounds {
            min: self.world_to_coord(center - reach),
            max: self.world_to_coord(center + reach),
        }
    }

    /// Brings the store in line with the region around `center`.
    ///
    /// Missing coordinates get a fresh node, present ones have their
    /// walkability re-tested, and anything outside the new bounds is dropped.
    pub fn ensure_region<Q>(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        obstacles: &Q,
    ) -> RegionDelta
    where
        Q: ObstacleQuery + ?Sized,
    {
        let bounds = self.region_bounds(center, half_extents);
        let mut delta = RegionDelta::default();

        let before = self.nodes.len();
        self.nodes.retain(|coord, _| bounds.contains(*coord));
        delta.removed = before - self.nodes.len();

        for coord in bounds.coords() {
            let position = self.coord_to_world(coord);
            let walkable = !obstacles.is_point_blocked(position, self.node_radius);
            match self.nodes.get_mut(&coord) {
                Some(node) => {
                    node.position = position;
                    node.walkable = walkable;
                    delta.refreshed += 1;
                }
                None => {
                    let node = Node {
                        coord,
                        position,
                        walkable,
                    };
                    self.nodes.insert(coord, node);
                    delta.created += 1;
                }
            }
        }

        self.bounds = Some(bounds);
        self.last_center = Some(center);
        self.last_half_extents = Some(half_extents);
        debug!(
            "grid resync at ({:.2}, {:.2}): {:?}, {} nodes",
            center.x,
            center.y,
            delta,
            self.nodes.len()
        );
        delta
    }

    /// Resyncs only when the viewport moved more than one node width or was resized.
    pub fn sync_to_viewport<Q>(
        &mut self,
        viewport: &Viewport,
        obstacles: &Q,
    ) -> Option<RegionDelta>
    where
        Q: ObstacleQuery + ?Sized,
    {
        let stale = match (self.last_center, self.last_half_extents) {
            (Some(center), Some(half_extents)) => {
                center.distance(viewport.center) > self.node_size
                    || half_extents != viewport.half_extents
            }
            _ => true,
        };
        if !stale {
            return None;
        }
        Some(self.ensure_region(
            viewport.center,
            viewport.half_extents,
            obstacles,
        ))
    }

    pub fn bounds(&self) -> Option<GridBounds> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, coord: GridCoord) -> Option<&Node> {
        self.nodes.get(&coord)
    }

    pub fn node_at(&self, point: Vec2) -> Option<&Node> {
        self.node(self.world_to_coord(point))
    }

    pub fn is_walkable(&self, coord: GridCoord) -> bool {
        self.nodes.get(&coord).is_some_and(|n| n.walkable)
    }

    /// Adjacent nodes (up to 8) that exist in the store, walkable or not.
    pub fn neighbors(&self, coord: GridCoord) -> impl Iterator<Item = &Node> + '_ {
        coord
            .neighbors_8()
            .into_iter()
            .filter_map(move |n| self.nodes.get(&n))
    }

    /// Coordinates currently held, for collaborators that toggle per-agent state.
    pub fn visible_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.nodes.keys().copied()
    }

    pub fn is_in_bounds(&self, point: Vec2) -> bool {
        self.bounds.is_some_and(|b| b.contains(self.world_to_coord(point)))
    }

    /// Pulls `point` inside the span of node positions; unchanged before the first sync.
    pub fn clamp_to_bounds(&self, point: Vec2) -> Vec2 {
        match self.bounds {
            Some(b) => point.clamp(self.coord_to_world(b.min), self.coord_to_world(b.max)),
            None => point,
        }
    }

    pub fn is_position_in_grid(&self, point: Vec2) -> bool {
        self.is_in_bounds(point) && self.node_at(point).is_some()
    }

    pub fn clamp_to_grid(&self, point: Vec2) -> Vec2 {
        self.clamp_to_bounds(point)
    }

    /// False for points no node covers.
    pub fn node_walkability(&self, point: Vec2) -> bool {
        self.node_at(point).is_some_and(|n| n.walkable)
    }
}
