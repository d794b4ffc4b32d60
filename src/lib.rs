//! Grid pathfinding for agents chasing a moving viewport.
//!
//! A [`grid::GridStore`] keeps a sparse window of nodes around the camera,
//! re-testing walkability against an [`obstacles::ObstacleQuery`] whenever the
//! view moves far enough. A [`pathfinder::Pathfinder`] answers path queries
//! against that window with a capped A* search, a straight-line fallback and a
//! waypoint optimizer.

pub mod agent;
pub mod algorithms;
pub mod config;
pub mod error;
pub mod grid;
pub mod obstacles;
pub mod pathfinder;
pub mod scratch;
pub mod simulation;
pub mod statistics;

pub use config::PathfinderConfig;
pub use error::ConfigError;
pub use grid::{GridCoord, GridStore, Viewport};
pub use obstacles::{Obstacle, ObstacleField, ObstacleQuery};
pub use pathfinder::Pathfinder;
