use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use viewport_pathfinding::algorithms::reference::reference_path;
use viewport_pathfinding::simulation::path_length;
use viewport_pathfinding::{
    GridCoord, GridStore, Obstacle, ObstacleField, ObstacleQuery, Pathfinder, PathfinderConfig,
    Viewport,
};

fn setup(
    field: &ObstacleField,
    config: PathfinderConfig,
    center: Vec2,
    half: Vec2,
) -> (GridStore, Pathfinder) {
    let mut grid = GridStore::new(&config);
    grid.sync_to_viewport(&Viewport::new(center, half), field);
    let pathfinder = Pathfinder::new(config).unwrap();
    (grid, pathfinder)
}

fn random_field(rng: &mut StdRng, count: usize, half: f32) -> ObstacleField {
    let mut field = ObstacleField::new();
    for _ in 0..count {
        let center = Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half));
        if rng.gen_bool(0.5) {
            field.add(Obstacle::circle(center, rng.gen_range(0.3..2.0)));
        } else {
            let extent = Vec2::new(rng.gen_range(0.2..2.5), rng.gen_range(0.2..2.5));
            field.add(Obstacle::rect(center - extent, center + extent));
        }
    }
    field
}

#[test]
fn coordinates_round_trip_through_world_space() {
    let config = PathfinderConfig {
        node_size: 0.5,
        node_radius: 0.2,
        grid_origin: Vec2::new(0.3, -1.2),
        ..Default::default()
    };
    let grid = GridStore::new(&config);
    for x in -40..40 {
        for y in -40..40 {
            let coord = GridCoord::new(x, y);
            assert_eq!(grid.world_to_coord(grid.coord_to_world(coord)), coord);
        }
    }
}

#[test]
fn open_ground_collapses_to_a_straight_line() {
    let field = ObstacleField::new();
    let half = Vec2::new(12.0, 6.0);
    let (grid, mut pf) = setup(&field, PathfinderConfig::default(), Vec2::ZERO, half);

    let start = Vec2::new(0.0, 0.0);
    let target = Vec2::new(10.0, 0.0);
    let path = pf.find_path(&grid, &field, start, target);
    assert_eq!(path, vec![start, target]);
    assert_eq!(pf.stats().searches, 1);
    assert_eq!(pf.stats().found, 1);
    assert_eq!(pf.stats().raw_waypoints, 11);
    assert_eq!(pf.stats().optimized_waypoints, 2);
}

#[test]
fn detours_around_a_circle_on_the_direct_line() {
    let center = Vec2::new(2.5, 0.0);
    let field = ObstacleField::with_obstacles(vec![Obstacle::circle(center, 1.0)]);
    let half = Vec2::new(8.0, 6.0);
    let (grid, mut pf) = setup(&field, PathfinderConfig::default(), center, half);

    let start = Vec2::new(0.0, 0.0);
    let target = Vec2::new(5.0, 0.0);
    let path = pf.find_path(&grid, &field, start, target);

    assert!(path.len() >= 3);
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&target));
    assert!(path.iter().any(|p| p.y.abs() > 0.5));
    assert!(path
        .windows(2)
        .all(|w| !field.is_segment_blocked(w[0], w[1])));
}

#[test]
fn unresolvable_target_gives_straight_line() {
    let blob = Obstacle::circle(Vec2::new(20.0, 0.0), 6.0);
    let field = ObstacleField::with_obstacles(vec![blob]);
    let config = PathfinderConfig {
        max_resolve_expansion: 5,
        ..Default::default()
    };
    let (grid, mut pf) = setup(&field, config, Vec2::new(10.0, 0.0), Vec2::new(16.0, 8.0));

    let start = Vec2::ZERO;
    let target = Vec2::new(20.0, 0.0);
    assert_eq!(pf.resolve(&grid, target), None);
    let path = pf.find_path(&grid, &field, start, target);
    assert_eq!(path, vec![start, target]);
    assert_eq!(pf.stats().unresolved, 1);
    assert_eq!(pf.stats().searches, 0);
}

#[test]
fn overlong_paths_are_replaced_by_the_fallback() {
    let field = ObstacleField::new();
    let config = PathfinderConfig {
        max_path_length: 5,
        ..Default::default()
    };
    let (grid, mut pf) = setup(&field, config, Vec2::ZERO, Vec2::new(10.0, 4.0));

    let start = Vec2::new(-8.0, 0.0);
    let target = Vec2::new(8.0, 0.0);
    let path = pf.find_path(&grid, &field, start, target);
    assert_eq!(path, vec![start, target]);
    assert_eq!(pf.stats().too_long, 1);
    assert_eq!(pf.stats().fallbacks, 1);
}

#[test]
fn random_queries_keep_endpoints_and_bounds() {
    let mut rng = StdRng::seed_from_u64(2024);
    let field = random_field(&mut rng, 40, 20.0);
    let config = PathfinderConfig {
        max_path_length: 64,
        scratch_pool_size: 2,
        ..Default::default()
    };
    let (grid, mut pf) = setup(&field, config, Vec2::ZERO, Vec2::new(18.0, 12.0));

    for _ in 0..200 {
        let start = Vec2::new(rng.gen_range(-18.0..18.0), rng.gen_range(-12.0..12.0));
        let target = Vec2::new(rng.gen_range(-18.0..18.0), rng.gen_range(-12.0..12.0));
        let path = pf.find_path(&grid, &field, start, target);

        assert!(path.len() >= 2);
        assert!(path.len() <= 64);
        assert_eq!(path[0], start);
        assert_eq!(path[path.len() - 1], target);
        assert_eq!(pf.pool().available(), 2);
    }

    let stats = pf.stats();
    assert_eq!(stats.queries, 200);
    let answered = stats.shortcuts + stats.searches + stats.unresolved;
    assert_eq!(stats.queries, answered);
    assert!(stats.optimized_waypoints <= stats.raw_waypoints);
    assert!(pf.pool().high_water_mark() <= 2);
}

#[test]
fn returned_paths_stay_close_to_the_reference_route() {
    let mut rng = StdRng::seed_from_u64(99);
    let field = random_field(&mut rng, 25, 14.0);
    let half = Vec2::splat(14.0);
    let (grid, mut pf) = setup(&field, PathfinderConfig::default(), Vec2::ZERO, half);
    // A diagonal step is priced at 1.4 but spans sqrt(2).
    let stretch = std::f32::consts::SQRT_2 / pf.config().diagonal_factor;

    let mut compared = 0;
    for _ in 0..50 {
        let start = Vec2::new(rng.gen_range(-14.0..14.0), rng.gen_range(-14.0..14.0));
        let target = Vec2::new(rng.gen_range(-14.0..14.0), rng.gen_range(-14.0..14.0));
        let (Some(from), Some(to)) = (pf.resolve(&grid, start), pf.resolve(&grid, target))
        else {
            continue;
        };
        let diagonal = pf.config().diagonal_factor;
        let Some((_, cost)) = reference_path(&grid, from, to, diagonal) else {
            continue;
        };
        let path = pf.find_path(&grid, &field, start, target);

        let bound = start.distance(grid.coord_to_world(from))
            + cost * grid.node_size() * stretch
            + target.distance(grid.coord_to_world(to));
        assert!(path_length(&path) <= bound + 1e-3);
        compared += 1;
    }
    assert!(compared > 0);
}

#[test]
fn resync_keeps_exactly_the_visible_window() {
    let wall = Obstacle::rect(Vec2::new(3.0, -1.0), Vec2::new(4.0, 1.0));
    let field = ObstacleField::with_obstacles(vec![wall]);
    let mut grid = GridStore::new(&PathfinderConfig::default());

    let first = Viewport::new(Vec2::ZERO, Vec2::new(5.0, 3.0));
    let delta = grid.sync_to_viewport(&first, &field).unwrap();
    let bounds = grid.bounds().unwrap();
    assert_eq!(delta.created, bounds.len());
    assert_eq!(grid.len(), bounds.len());
    assert!(grid.visible_coords().all(|c| bounds.contains(c)));
    assert!(!grid.is_walkable(GridCoord::new(3, 0)));

    let nudged = Viewport::new(Vec2::new(0.6, 0.0), Vec2::new(5.0, 3.0));
    assert!(grid.sync_to_viewport(&nudged, &field).is_none());

    let moved = Viewport::new(Vec2::new(4.0, 0.0), Vec2::new(5.0, 3.0));
    let delta = grid.sync_to_viewport(&moved, &field).unwrap();
    let bounds = grid.bounds().unwrap();
    assert_eq!(delta.removed, 4 * 11);
    assert_eq!(delta.created, 4 * 11);
    assert_eq!(grid.len(), bounds.len());
    assert!(grid.visible_coords().all(|c| bounds.contains(c)));
    assert!(!grid.is_walkable(GridCoord::new(3, 0)));

    let zoomed = Viewport::new(Vec2::new(4.0, 0.0), Vec2::new(6.0, 3.0));
    assert!(grid.sync_to_viewport(&zoomed, &field).is_some());
    assert_eq!(grid.len(), grid.bounds().unwrap().len());
}
