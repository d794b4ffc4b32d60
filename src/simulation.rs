use std::time::Instant;

use glam::Vec2;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agent::Agent;
use crate::algorithms::reference::reference_path;
use crate::config::Config;
use crate::error::ConfigError;
use crate::grid::{GridStore, Viewport};
use crate::obstacles::{Obstacle, ObstacleField};
use crate::pathfinder::Pathfinder;
use crate::statistics::{PathfinderStats, SimulationStats, TimingData};

/// Frames an agent follows one path before asking again.
const REPLAN_INTERVAL: usize = 15;
/// Radius around the camera's starting point kept free of obstacles.
const SPAWN_CLEARANCE: f32 = 6.0;

#[derive(Debug, Clone)]
pub struct EnvironmentSetup {
    pub seed: u64,
    pub world_size: f32,
    pub obstacles: ObstacleField,
    pub agent_starts: Vec<Vec2>,
    pub camera_start: Vec2,
}

impl EnvironmentSetup {
    /// Random world with a reproducible layout for a given seed.
    pub fn generate(config: &Config, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let half = config.world_size / 2.0;
        let track = CameraTrack::new(config.world_size, config.view_width, config.view_height);
        let camera_start = track.point_at(0.0);

        let mut obstacles = ObstacleField::new();
        let mut attempts = 0;
        while obstacles.len() < config.num_obstacles && attempts < config.num_obstacles * 10 {
            attempts += 1;
            let center = Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half));
            let obstacle = if rng.gen_bool(0.5) {
                Obstacle::circle(center, rng.gen_range(0.5..3.0))
            } else {
                let extent = Vec2::new(rng.gen_range(0.5..4.0), rng.gen_range(0.5..4.0));
                Obstacle::rect(center - extent, center + extent)
            };
            if center.distance(camera_start) < SPAWN_CLEARANCE + 4.0 {
                continue;
            }
            obstacles.add(obstacle);
        }

        // Half the agents start near the camera, the rest anywhere in the world.
        let agent_starts = (0..config.num_agents)
            .map(|i| {
                if i % 2 == 0 {
                    let offset = Vec2::new(
                        rng.gen_range(-config.view_width / 2.0..config.view_width / 2.0),
                        rng.gen_range(-config.view_height / 2.0..config.view_height / 2.0),
                    );
                    camera_start + offset
                } else {
                    Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half))
                }
            })
            .collect();

        info!(
            "generated environment: seed {}, {} obstacles, {} agents",
            seed,
            obstacles.len(),
            config.num_agents
        );

        EnvironmentSetup {
            seed,
            world_size: config.world_size,
            obstacles,
            agent_starts,
            camera_start,
        }
    }
}

/// Closed rectangular loop the camera center follows, inset so the view stays in the world.
#[derive(Debug, Clone, Copy)]
struct CameraTrack {
    min: Vec2,
    max: Vec2,
}

impl CameraTrack {
    fn new(world_size: f32, view_width: f32, view_height: f32) -> Self {
        let half = world_size / 2.0;
        let inset = Vec2::new(
            (half - view_width / 2.0).max(0.0),
            (half - view_height / 2.0).max(0.0),
        );
        CameraTrack {
            min: -inset,
            max: inset,
        }
    }

    fn perimeter(&self) -> f32 {
        let size = self.max - self.min;
        2.0 * (size.x + size.y)
    }

    /// Point `distance` along the loop, counter-clockwise from the bottom-left corner.
    fn point_at(&self, distance: f32) -> Vec2 {
        let size = self.max - self.min;
        let perimeter = self.perimeter();
        if perimeter <= 0.0 {
            return self.min;
        }
        let mut d = distance.rem_euclid(perimeter);
        if d < size.x {
            return Vec2::new(self.min.x + d, self.min.y);
        }
        d -= size.x;
        if d < size.y {
            return Vec2::new(self.max.x, self.min.y + d);
        }
        d -= size.y;
        if d < size.x {
            return Vec2::new(self.max.x - d, self.max.y);
        }
        d -= size.x;
        Vec2::new(self.min.x, self.max.y - d)
    }
}

/// Pans along the track, optionally breathing its zoom.
#[derive(Debug, Clone)]
pub struct Camera {
    track: CameraTrack,
    travelled: f32,
    speed: f32,
    base_half_extents: Vec2,
    zoom_amplitude: f32,
}

impl Camera {
    pub fn new(config: &Config) -> Self {
        Camera {
            track: CameraTrack::new(config.world_size, config.view_width, config.view_height),
            travelled: 0.0,
            speed: config.camera_speed,
            base_half_extents: Vec2::new(config.view_width, config.view_height) / 2.0,
            zoom_amplitude: config.zoom_amplitude,
        }
    }

    pub fn advance(&mut self) {
        self.travelled += self.speed;
    }

    pub fn viewport(&self, frame: usize) -> Viewport {
        // Zoom steps in tenths so small oscillations do not force a resync every frame.
        let phase = (frame as f32 * 0.01).sin();
        let zoom = 1.0 + (self.zoom_amplitude * phase * 10.0).round() / 10.0;
        Viewport::new(
            self.track.point_at(self.travelled),
            self.base_half_extents * zoom.max(0.1),
        )
    }
}

pub struct Simulation {
    config: Config,
    environment: EnvironmentSetup,
    grid: GridStore,
    pathfinder: Pathfinder,
    camera: Camera,
    agents: Vec<Agent>,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        // Generation samples ranges sized by these values.
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let environment = EnvironmentSetup::generate(&config, seed);
        Self::new_with_environment(config, environment)
    }

    pub fn new_with_environment(
        config: Config,
        environment: EnvironmentSetup,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let pathfinder = Pathfinder::new(config.pathfinder_config())?;
        let grid = GridStore::try_new(pathfinder.config())?;
        let camera = Camera::new(&config);
        let agents = environment
            .agent_starts
            .iter()
            .map(|&start| Agent::new(start, config.agent_speed))
            .collect();

        Ok(Simulation {
            config,
            environment,
            grid,
            pathfinder,
            camera,
            agents,
        })
    }

    pub fn environment(&self) -> &EnvironmentSetup {
        &self.environment
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn run(&mut self) -> (SimulationStats, PathfinderStats, TimingData) {
        let mut stats = SimulationStats::default();
        let mut timing = TimingData::new();
        let obstacles = &self.environment.obstacles;
        let mut target = self.environment.camera_start;

        for frame in 0..self.config.frames {
            self.camera.advance();
            let viewport = self.camera.viewport(frame);
            target = viewport.center;

            let resync_start = Instant::now();
            if let Some(delta) = self.grid.sync_to_viewport(&viewport, obstacles) {
                timing.resync_times.push(resync_start.elapsed());
                stats.resyncs += 1;
                stats.nodes_created += delta.created;
                stats.nodes_removed += delta.removed;
            }

            let interval = self.config.efficiency_interval;
            let sample_efficiency = interval > 0 && frame % interval == 0;
            let mut sampled = false;

            for agent in self.agents.iter_mut() {
                if !agent.update_collision(&self.grid) {
                    stats.inactive_agent_frames += 1;
                    continue;
                }
                if agent.needs_path(REPLAN_INTERVAL) {
                    let call_start = Instant::now();
                    let path = self
                        .pathfinder
                        .find_path(&self.grid, obstacles, agent.position, target);
                    timing.find_path_times.push(call_start.elapsed());

                    if sample_efficiency && !sampled {
                        if let Some(ratio) = route_efficiency(&self.pathfinder, &self.grid, &path) {
                            stats.efficiency_samples.push(ratio);
                            sampled = true;
                        }
                    }
                    agent.set_path(path);
                }
                agent.advance();
            }

            if !self.config.quiet && frame % 100 == 0 {
                info!(
                    "frame {}: camera ({:.1}, {:.1}), {} nodes, {} queries",
                    frame,
                    viewport.center.x,
                    viewport.center.y,
                    self.grid.len(),
                    self.pathfinder.stats().queries
                );
            }
        }

        stats.frames = self.config.frames;
        let catch_radius = 2.0 * self.pathfinder.config().node_size;
        stats.agents_caught_up = self
            .agents
            .iter()
            .filter(|a| a.position.distance(target) <= catch_radius)
            .count();

        (stats, self.pathfinder.stats().clone(), timing)
    }
}

pub fn path_length(path: &[Vec2]) -> f32 {
    path.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Returned length over the reference optimum between the same resolved nodes.
/// `None` for shortcut-sized queries or when no reference path exists.
fn route_efficiency(pathfinder: &Pathfinder, grid: &GridStore, path: &[Vec2]) -> Option<f64> {
    let (&start, &target) = (path.first()?, path.last()?);
    let from = pathfinder.resolve(grid, start)?;
    let to = pathfinder.resolve(grid, target)?;
    let (_, cost) = reference_path(grid, from, to, pathfinder.config().diagonal_factor)?;
    let optimal = cost * grid.node_size();
    if optimal < pathfinder.config().shortcut_distance() {
        return None;
    }
    Some(path_length(path) as f64 / optimal as f64)
}
