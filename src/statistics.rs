use std::fmt;
use std::time::Duration;

/// Running counters kept by a `Pathfinder`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathfinderStats {
    pub queries: usize,
    pub shortcuts: usize,
    pub searches: usize,
    pub found: usize,
    pub exhausted: usize,
    pub cap_reached: usize,
    pub too_long: usize,
    /// Straight-line answers given because resolution or search failed.
    pub fallbacks: usize,
    pub unresolved: usize,
    pub iterations: usize,
    pub raw_waypoints: usize,
    pub optimized_waypoints: usize,
}

impl PathfinderStats {
    pub fn average_iterations(&self) -> f64 {
        if self.searches == 0 {
            0.0
        } else {
            self.iterations as f64 / self.searches as f64
        }
    }

    /// Fraction of raw waypoints the optimizer removed.
    pub fn waypoint_reduction(&self) -> f64 {
        if self.raw_waypoints == 0 {
            0.0
        } else {
            1.0 - self.optimized_waypoints as f64 / self.raw_waypoints as f64
        }
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl fmt::Display for PathfinderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pathfinder Statistics:")?;
        writeln!(f, "Total queries: {}", self.queries)?;
        writeln!(
            f,
            "Shortcuts: {} ({:.1}%)",
            self.shortcuts,
            percent(self.shortcuts, self.queries)
        )?;
        writeln!(
            f,
            "Searches: {} (found {}, exhausted {}, capped {}, too long {})",
            self.searches, self.found, self.exhausted, self.cap_reached, self.too_long
        )?;
        writeln!(
            f,
            "Average iterations per search: {:.1}",
            self.average_iterations()
        )?;
        writeln!(
            f,
            "Fallback paths: {} ({:.1}%), unresolved endpoints: {}",
            self.fallbacks,
            percent(self.fallbacks, self.queries),
            self.unresolved
        )?;
        writeln!(
            f,
            "Waypoints: {} raw -> {} optimized ({:.1}% removed)",
            self.raw_waypoints,
            self.optimized_waypoints,
            self.waypoint_reduction() * 100.0
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimingData {
    pub resync_times: Vec<Duration>,
    pub find_path_times: Vec<Duration>,
}

impl TimingData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn average_resync_time(&self) -> Duration {
        average(&self.resync_times)
    }

    pub fn average_find_path_time(&self) -> Duration {
        average(&self.find_path_times)
    }

    pub fn max_find_path_time(&self) -> Duration {
        self.find_path_times
            .iter()
            .copied()
            .max()
            .unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.find_path_times.len()
    }
}

fn average(samples: &[Duration]) -> Duration {
    if samples.is_empty() {
        Duration::from_nanos(0)
    } else {
        let total: Duration = samples.iter().sum();
        total / samples.len() as u32
    }
}

/// Outcome of one simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub frames: usize,
    pub resyncs: usize,
    pub nodes_created: usize,
    pub nodes_removed: usize,
    /// Agent-frames spent outside the grid with collision disabled.
    pub inactive_agent_frames: usize,
    pub agents_caught_up: usize,
    /// Returned path length over reference-optimal length, one per sample.
    pub efficiency_samples: Vec<f64>,
}

impl SimulationStats {
    pub fn route_efficiency(&self) -> f64 {
        if self.efficiency_samples.is_empty() {
            0.0
        } else {
            let total: f64 = self.efficiency_samples.iter().sum();
            total / self.efficiency_samples.len() as f64
        }
    }
}

impl fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames: {}", self.frames)?;
        writeln!(f, "Grid resyncs: {}", self.resyncs)?;
        writeln!(
            f,
            "Nodes created: {} | removed: {}",
            self.nodes_created, self.nodes_removed
        )?;
        writeln!(f, "Inactive agent-frames: {}", self.inactive_agent_frames)?;
        writeln!(
            f,
            "Agents that caught the camera: {}",
            self.agents_caught_up
        )?;
        if self.efficiency_samples.is_empty() {
            writeln!(f, "Route efficiency: no samples")?;
        } else {
            writeln!(
                f,
                "Route efficiency: {:.3} over {} samples",
                self.route_efficiency(),
                self.efficiency_samples.len()
            )?;
            if self.route_efficiency() < 1.0 {
                writeln!(
                    f,
                    "Note: optimized paths cut corners the grid search cannot"
                )?;
            }
        }
        Ok(())
    }
}
