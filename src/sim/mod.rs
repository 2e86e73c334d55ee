//! Simulation driver: run-mode state machine and tick loop.
//!
//! One [`Simulation`] instance per active run, owned by the caller. BUILD
//! mode accepts edits (add obstacle, place robot, clear) and forbids
//! ticking; SIM mode forbids edits and advances the active algorithm one
//! tick at a time. The run completes once the full-coverage percentage
//! reaches the configured stop threshold; there is no way back to BUILD,
//! start a fresh instance instead.

use crate::algorithms::{AlgorithmKind, MotionAlgorithm};
use crate::config::SimConfig;
use crate::core::{Rect, Robot, Vec2};
use crate::environment::{EnvParams, RoomEnvironment};
use crate::error::{Result, SimError};
use crate::events::Event;
use crate::grid::TileState;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Net displacement below this many pixels counts as "not moving" for
/// stall detection.
const STALL_EPSILON: f32 = 0.01;

/// Run-mode state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Editing phase: obstacle/robot edits allowed, no ticking.
    Build,
    /// Autonomous run: algorithm ticking allowed, no edits.
    Sim,
    /// Terminal: stop threshold reached, state retained for query.
    SimComplete,
}

/// Read-only snapshot of the current simulation state.
#[derive(Clone, Debug, Serialize)]
pub struct SimSnapshot {
    /// Obstacle rectangles
    pub obstacles: Vec<Rect>,
    /// Robot, if placed
    pub robot: Option<Robot>,
    /// Grid dimensions (cols, rows)
    pub grid_size: (u32, u32),
    /// Tile states in row-major order
    pub tiles: Vec<TileState>,
    /// Ticks elapsed in SIM mode
    pub ticks: u64,
    /// Visited tiles / countable tiles, percent
    pub coverage: f32,
    /// Fully cleaned tiles / countable tiles, percent
    pub full_coverage: f32,
    /// Current run mode
    pub run_mode: RunMode,
}

/// The simulation driver.
pub struct Simulation {
    environment: RoomEnvironment,
    algorithm: Box<dyn MotionAlgorithm>,
    robot_radius: f32,
    stop_at_coverage: f32,
    stall_ticks: u32,
    ticks: u64,
    /// Result events per tick, in order
    event_stream: Vec<Vec<Event>>,
    /// Previous tick's results, handed to the algorithm as feedback
    feedback: Vec<Event>,
    stall_counter: u32,
}

impl Simulation {
    /// Create a simulation from a configuration and a named layout.
    pub fn from_config(config: &SimConfig, layout_id: &str, kind: AlgorithmKind, seed: Option<u64>) -> Result<Self> {
        let layout = config
            .layout(layout_id)
            .ok_or_else(|| SimError::UnknownLayout(layout_id.to_string()))?;
        info!(layout = layout_id, name = %layout.name, algorithm = ?kind, "creating simulation");

        let params = EnvParams {
            width: config.environment.width,
            height: config.environment.height,
            tile_size: config.environment.tile_size,
            clean_passes: config.simulation.clean_passes,
            dirt_per_cover: config.robot.dirt_per_cover,
            robot_speed: config.robot.wss,
        };
        let environment = RoomEnvironment::with_layout(
            params,
            &layout.obstacle_rects(),
            layout.robot_placement(),
        );
        let bounds = environment.bounds();
        Ok(Self {
            environment,
            algorithm: kind.build(bounds, config.robot.rss, seed),
            robot_radius: config.robot.radius,
            stop_at_coverage: config.simulation.stop_at_coverage,
            stall_ticks: config.simulation.stall_ticks,
            ticks: 0,
            event_stream: Vec::new(),
            feedback: Vec::new(),
            stall_counter: 0,
        })
    }

    /// Create a simulation over an existing environment (tests, embedding).
    pub fn new(
        environment: RoomEnvironment,
        algorithm: Box<dyn MotionAlgorithm>,
        robot_radius: f32,
        stop_at_coverage: f32,
        stall_ticks: u32,
    ) -> Self {
        Self {
            environment,
            algorithm,
            robot_radius,
            stop_at_coverage,
            stall_ticks,
            ticks: 0,
            event_stream: Vec::new(),
            feedback: Vec::new(),
            stall_counter: 0,
        }
    }

    /// Current run mode
    pub fn run_mode(&self) -> RunMode {
        self.environment.mode()
    }

    /// Ticks elapsed
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The environment (read-only)
    pub fn environment(&self) -> &RoomEnvironment {
        &self.environment
    }

    /// Result events per tick since the run started
    pub fn event_stream(&self) -> &[Vec<Event>] {
        &self.event_stream
    }

    /// Visited-tile coverage, percent
    pub fn coverage(&self) -> f32 {
        self.environment.grid().coverage_percentage()
    }

    /// Fully-cleaned coverage, percent
    pub fn full_coverage(&self) -> f32 {
        self.environment.grid().full_coverage_percentage()
    }

    fn ensure_build(&self, op: &'static str) -> Result<()> {
        match self.run_mode() {
            RunMode::Build => Ok(()),
            mode => Err(SimError::IllegalMode { op, mode }),
        }
    }

    /// Add an obstacle (BUILD mode). Returns whether the environment
    /// accepted the placement.
    pub fn add_obstacle(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<bool> {
        self.ensure_build("add_obstacle")?;
        let results = self
            .environment
            .apply(&[Event::add_obstacle(Rect::new(x, y, width, height))]);
        Ok(matches!(
            results.first(),
            Some(Event::ObstacleAdded { accepted: true, .. })
        ))
    }

    /// Place the robot at `(x, y)` with the configured radius (BUILD
    /// mode). Returns whether the placement was accepted.
    pub fn place_robot(&mut self, x: f32, y: f32) -> Result<bool> {
        self.ensure_build("place_robot")?;
        let results = self
            .environment
            .apply(&[Event::place_robot(Vec2::new(x, y), self.robot_radius)]);
        Ok(matches!(
            results.first(),
            Some(Event::RobotPlaced { accepted: true, .. })
        ))
    }

    /// Remove all obstacles and reset the tile grid (BUILD mode). The
    /// robot, if placed, keeps its position.
    pub fn clear_obstacles(&mut self) -> Result<()> {
        self.ensure_build("clear_obstacles")?;
        self.environment.apply(&[Event::ObstaclesCleared]);
        Ok(())
    }

    /// Transition BUILD -> SIM. Fails without a placed robot.
    pub fn start_simulation(&mut self) -> Result<()> {
        self.environment.begin_sim()?;
        info!(
            algorithm = self.algorithm.name(),
            countable_tiles = self.environment.grid().countable_tiles(),
            "simulation started"
        );
        Ok(())
    }

    /// Advance the simulation one tick.
    ///
    /// Returns `(keep_running, events)`; `keep_running` is `false` once
    /// the full-coverage stop threshold has been reached (terminal
    /// SimComplete state, further calls keep returning `false`).
    pub fn step(&mut self) -> Result<(bool, Vec<Event>)> {
        match self.run_mode() {
            RunMode::Sim => {}
            RunMode::SimComplete => return Ok((false, Vec::new())),
            mode => {
                return Err(SimError::IllegalMode { op: "step", mode });
            }
        }

        let robot = *self.environment.robot().ok_or(SimError::NoRobotPlaced)?;
        let feedback = std::mem::take(&mut self.feedback);
        let proposals = self
            .algorithm
            .update(self.environment.obstacles(), &robot, &feedback);
        let mut results = self.environment.apply(&proposals);

        // Stall detection: consecutive ticks without net displacement
        let displacement = self
            .environment
            .robot()
            .map(|r| r.position.distance(&robot.position))
            .unwrap_or(0.0);
        if displacement < STALL_EPSILON {
            self.stall_counter += 1;
            if self.stall_counter == self.stall_ticks {
                warn!(
                    ticks = self.stall_counter,
                    algorithm = self.algorithm.name(),
                    "algorithm stalled"
                );
                results.push(Event::AlgorithmStalled {
                    ticks: self.stall_counter,
                });
                self.stall_counter = 0;
            }
        } else {
            self.stall_counter = 0;
        }

        self.ticks += 1;
        self.feedback = results.clone();
        self.event_stream.push(results.clone());

        let full_coverage = self.full_coverage();
        debug!(
            tick = self.ticks,
            coverage = self.coverage(),
            full_coverage,
            "tick complete"
        );
        if full_coverage >= self.stop_at_coverage {
            info!(
                ticks = self.ticks,
                coverage = self.coverage(),
                full_coverage,
                "stop threshold reached"
            );
            self.environment.complete();
            return Ok((false, results));
        }
        Ok((true, results))
    }

    /// Snapshot the full observable state for external consumers.
    pub fn snapshot(&self) -> SimSnapshot {
        let grid = self.environment.grid();
        let (cols, rows) = (grid.cols(), grid.rows());
        let mut tiles = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                tiles.push(grid.state(col, row));
            }
        }
        SimSnapshot {
            obstacles: self.environment.obstacles().to_vec(),
            robot: self.environment.robot().copied(),
            grid_size: (cols, rows),
            tiles,
            ticks: self.ticks,
            coverage: self.coverage(),
            full_coverage: self.full_coverage(),
            run_mode: self.run_mode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(kind: AlgorithmKind) -> Simulation {
        let config = SimConfig::default();
        Simulation::from_config(&config, "0", kind, Some(1)).unwrap()
    }

    #[test]
    fn edits_allowed_only_in_build_mode() {
        let mut sim = sim(AlgorithmKind::RandomBounce);
        assert!(sim.add_obstacle(100.0, 100.0, 50.0, 50.0).unwrap());
        assert!(sim.place_robot(400.0, 300.0).unwrap());
        sim.start_simulation().unwrap();

        assert!(matches!(
            sim.add_obstacle(200.0, 200.0, 10.0, 10.0),
            Err(SimError::IllegalMode { .. })
        ));
        assert!(matches!(
            sim.place_robot(100.0, 100.0),
            Err(SimError::IllegalMode { .. })
        ));
        assert!(matches!(
            sim.clear_obstacles(),
            Err(SimError::IllegalMode { .. })
        ));
    }

    #[test]
    fn step_requires_sim_mode() {
        let mut sim = sim(AlgorithmKind::RandomBounce);
        assert!(matches!(
            sim.step(),
            Err(SimError::IllegalMode { op: "step", .. })
        ));
    }

    #[test]
    fn start_requires_robot() {
        let mut sim = sim(AlgorithmKind::RandomBounce);
        assert!(matches!(
            sim.start_simulation(),
            Err(SimError::NoRobotPlaced)
        ));
    }

    #[test]
    fn ticks_advance_and_stream_accumulates() {
        let mut sim = sim(AlgorithmKind::SWalk);
        sim.place_robot(400.0, 300.0).unwrap();
        sim.start_simulation().unwrap();
        for _ in 0..10 {
            let (keep_running, _) = sim.step().unwrap();
            assert!(keep_running);
        }
        assert_eq!(sim.ticks(), 10);
        assert_eq!(sim.event_stream().len(), 10);
    }

    #[test]
    fn new_wraps_an_existing_environment() {
        let params = EnvParams {
            width: 400.0,
            height: 300.0,
            tile_size: 10.0,
            clean_passes: 1,
            dirt_per_cover: 10,
            robot_speed: 2.0,
        };
        let environment =
            RoomEnvironment::with_layout(params, &[], Some((Vec2::new(50.0, 50.0), 30.0)));
        let bounds = environment.bounds();
        let mut sim = Simulation::new(
            environment,
            AlgorithmKind::SWalk.build(bounds, 5.0, Some(1)),
            30.0,
            90.0,
            50,
        );
        sim.start_simulation().unwrap();
        let (keep_running, events) = sim.step().unwrap();
        assert!(keep_running);
        assert!(events.iter().any(|e| matches!(e, Event::RobotMoved { .. })));
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut sim = sim(AlgorithmKind::RandomBounce);
        sim.add_obstacle(100.0, 100.0, 50.0, 50.0).unwrap();
        sim.place_robot(400.0, 300.0).unwrap();
        let snap = sim.snapshot();
        assert_eq!(snap.obstacles.len(), 1);
        assert!(snap.robot.is_some());
        assert_eq!(snap.run_mode, RunMode::Build);
        assert_eq!(snap.grid_size, (80, 60));
        assert_eq!(snap.tiles.len(), 80 * 60);
        assert!(snap.coverage > 0.0);
    }

    #[test]
    fn stall_event_emitted_for_boxed_in_robot() {
        // Pocket in the top-left corner: room walls on two sides,
        // obstacles sealing the other two with less than one step of play
        let config = SimConfig::default();
        let mut sim =
            Simulation::from_config(&config, "0", AlgorithmKind::RandomBounce, Some(3)).unwrap();
        assert!(sim.add_obstacle(62.0, 0.0, 20.0, 82.0).unwrap());
        assert!(sim.add_obstacle(0.0, 62.0, 62.0, 20.0).unwrap());
        assert!(sim.place_robot(31.0, 31.0).unwrap());
        sim.start_simulation().unwrap();

        let mut stalled = false;
        for _ in 0..(config.simulation.stall_ticks + 5) {
            let (_, events) = sim.step().unwrap();
            if events
                .iter()
                .any(|e| matches!(e, Event::AlgorithmStalled { .. }))
            {
                stalled = true;
                break;
            }
        }
        assert!(stalled, "boxed-in robot never reported a stall");
        // Stall stays non-fatal
        assert_eq!(sim.run_mode(), RunMode::Sim);
    }
}
