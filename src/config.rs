use clap::Parser;
use glam::Vec2;

use crate::error::ConfigError;

/// Tunables shared by the grid store and the pathfinding engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PathfinderConfig {
    /// World units between adjacent node centers.
    pub node_size: f32,
    /// Radius handed to the obstacle oracle when testing a node.
    pub node_radius: f32,
    /// World position of coordinate (0, 0).
    pub grid_origin: Vec2,
    /// Extra world units kept around the viewport so nodes just off screen exist.
    pub view_margin: f32,
    /// Cost of a diagonal step relative to an orthogonal one.
    pub diagonal_factor: f32,
    /// Start/target closer than this many node widths may skip the search.
    pub shortcut_distance_factor: f32,
    /// Hard cap on open-list pops per search.
    pub max_iterations: usize,
    /// Nodes visited while looking for a walkable substitute endpoint.
    pub max_resolve_expansion: usize,
    /// Longest path `find_path` will hand back.
    pub max_path_length: usize,
    /// Lateral clearance checked by the optimizer, as a fraction of node size.
    pub clearance_fraction: f32,
    /// Scratch instances created up front.
    pub scratch_pool_size: usize,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        PathfinderConfig {
            node_size: 1.0,
            node_radius: 0.4,
            grid_origin: Vec2::ZERO,
            view_margin: 2.0,
            diagonal_factor: 1.4,
            shortcut_distance_factor: 3.0,
            max_iterations: 4096,
            max_resolve_expansion: 32,
            max_path_length: 512,
            clearance_fraction: 0.25,
            scratch_pool_size: 4,
        }
    }
}

impl PathfinderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.node_size.is_finite() && self.node_size > 0.0) {
            return Err(ConfigError::InvalidNodeSize(self.node_size));
        }
        if !(self.node_radius >= 0.0) {
            return Err(ConfigError::InvalidNodeRadius(self.node_radius));
        }
        if !(self.view_margin >= 0.0) {
            return Err(ConfigError::InvalidViewMargin(self.view_margin));
        }
        if !(1.0..=2.0).contains(&self.diagonal_factor) {
            return Err(ConfigError::InvalidDiagonalFactor(self.diagonal_factor));
        }
        if !(self.shortcut_distance_factor >= 0.0) {
            return Err(ConfigError::InvalidShortcutFactor(
                self.shortcut_distance_factor,
            ));
        }
        if !(0.0..0.5).contains(&self.clearance_fraction) {
            return Err(ConfigError::InvalidClearanceFraction(
                self.clearance_fraction,
            ));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterationCap);
        }
        if self.max_path_length < 2 {
            return Err(ConfigError::PathLengthTooShort(self.max_path_length));
        }
        Ok(())
    }

    /// Distance under which a clear straight line is returned without searching.
    pub fn shortcut_distance(&self) -> f32 {
        self.shortcut_distance_factor * self.node_size
    }

    /// Offset of the optimizer's parallel clearance segments.
    pub fn clearance(&self) -> f32 {
        self.clearance_fraction * self.node_size
    }
}

/// Command line options for the viewport simulation.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Side length of the square world, in world units.
    #[arg(long, default_value_t = 200.0)]
    pub world_size: f32,

    #[arg(long, default_value_t = 120)]
    pub num_obstacles: usize,

    #[arg(long, default_value_t = 40)]
    pub num_agents: usize,

    #[arg(long, default_value_t = 600)]
    pub frames: usize,

    #[arg(long, default_value_t = 32.0)]
    pub view_width: f32,

    #[arg(long, default_value_t = 18.0)]
    pub view_height: f32,

    /// Camera pan speed in world units per frame.
    #[arg(long, default_value_t = 0.25)]
    pub camera_speed: f32,

    /// Amplitude of the periodic zoom, as a fraction of the base view size.
    #[arg(long, default_value_t = 0.0)]
    pub zoom_amplitude: f32,

    #[arg(long, default_value_t = 0.2)]
    pub agent_speed: f32,

    #[arg(long, default_value_t = 1.0)]
    pub node_size: f32,

    #[arg(long, default_value_t = 4096)]
    pub max_iterations: usize,

    #[arg(long, default_value_t = 32)]
    pub max_resolve_expansion: usize,

    #[arg(long, default_value_t = 512)]
    pub max_path_length: usize,

    /// Frames between route-efficiency samples against the reference search.
    #[arg(long, default_value_t = 30)]
    pub efficiency_interval: usize,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Config {
    /// Checks the simulation flags, then the engine settings they produce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            return Err(ConfigError::InvalidWorldSize(self.world_size));
        }
        let view_ok = |v: f32| v.is_finite() && v > 0.0;
        if !(view_ok(self.view_width) && view_ok(self.view_height)) {
            return Err(ConfigError::InvalidViewSize(
                self.view_width,
                self.view_height,
            ));
        }
        if !(self.camera_speed.is_finite() && self.camera_speed >= 0.0) {
            return Err(ConfigError::InvalidCameraSpeed(self.camera_speed));
        }
        if !(self.agent_speed.is_finite() && self.agent_speed >= 0.0) {
            return Err(ConfigError::InvalidAgentSpeed(self.agent_speed));
        }
        self.pathfinder_config().validate()
    }

    pub fn pathfinder_config(&self) -> PathfinderConfig {
        PathfinderConfig {
            node_size: self.node_size,
            node_radius: self.node_size * 0.4,
            max_iterations: self.max_iterations,
            max_resolve_expansion: self.max_resolve_expansion,
            max_path_length: self.max_path_length,
            ..PathfinderConfig::default()
        }
    }
}
