//! Room environment: obstacles, robot, and coverage grid.
//!
//! The environment is the single owner of simulation state. All mutation
//! goes through [`RoomEnvironment::apply`], which resolves each incoming
//! event independently and in input order, echoing results back:
//!
//! ```text
//! algorithm ──(RobotMoved proposals)──▶ apply ──▶ RobotMoved echo
//!                                        │        CollisionDetected
//! editor ──(ObstacleAdded / RobotPlaced)─┘        TileCovered ...
//! ```
//!
//! Invariant: while a robot is present, its footprint circle never
//! overlaps any obstacle rectangle or room wall. Violating moves and
//! placements are rejected without state change, never clamped.

use crate::core::{Circle, Rect, Robot, Vec2};
use crate::error::{Result, SimError};
use crate::events::Event;
use crate::grid::TileGrid;
use crate::sim::RunMode;
use tracing::{debug, trace, warn};

/// Parameters the environment needs beyond the room dimensions.
#[derive(Clone, Copy, Debug)]
pub struct EnvParams {
    /// Room width in pixels
    pub width: f32,
    /// Room height in pixels
    pub height: f32,
    /// Tile edge length in pixels
    pub tile_size: f32,
    /// Cleaning passes required before a tile counts as fully cleaned
    pub clean_passes: u8,
    /// Score awarded per first visit of a tile
    pub dirt_per_cover: u32,
    /// Robot forward step length per tick in pixels
    pub robot_speed: f32,
}

/// The rectangular room with its obstacles, optional robot, and tile grid.
#[derive(Clone, Debug)]
pub struct RoomEnvironment {
    bounds: Rect,
    params: EnvParams,
    obstacles: Vec<Rect>,
    robot: Option<Robot>,
    grid: TileGrid,
    mode: RunMode,
    /// Result events from applying the initial layout
    initial_events: Vec<Event>,
}

impl RoomEnvironment {
    /// Create an empty environment in BUILD mode.
    pub fn new(params: EnvParams) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, params.width, params.height),
            params,
            obstacles: Vec::new(),
            robot: None,
            grid: TileGrid::new(
                params.width,
                params.height,
                params.tile_size,
                params.clean_passes,
            ),
            mode: RunMode::Build,
            initial_events: Vec::new(),
        }
    }

    /// Create an environment pre-populated from a layout: obstacle
    /// rectangles plus an optional robot `(x, y, radius)`.
    ///
    /// The layout passes through the same validation as interactive edits;
    /// rejected entries are logged and dropped, and all result events are
    /// retained in [`initial_events`](Self::initial_events).
    pub fn with_layout(
        params: EnvParams,
        obstacles: &[Rect],
        robot: Option<(Vec2, f32)>,
    ) -> Self {
        let mut env = Self::new(params);
        let mut events: Vec<Event> = obstacles.iter().map(|&r| Event::add_obstacle(r)).collect();
        if let Some((position, radius)) = robot {
            events.push(Event::place_robot(position, radius));
        }
        env.initial_events = env.apply(&events);
        env
    }

    /// Room bounds rectangle
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Current obstacle list
    #[inline]
    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    /// The robot, if placed
    #[inline]
    pub fn robot(&self) -> Option<&Robot> {
        self.robot.as_ref()
    }

    /// The coverage grid
    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Current run mode
    #[inline]
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Events produced while applying the initial layout
    #[inline]
    pub fn initial_events(&self) -> &[Event] {
        &self.initial_events
    }

    /// Transition BUILD -> SIM. Fails without a placed robot; there is no
    /// transition back to BUILD.
    pub fn begin_sim(&mut self) -> Result<()> {
        match self.mode {
            RunMode::Build => {
                if self.robot.is_none() {
                    return Err(SimError::NoRobotPlaced);
                }
                self.mode = RunMode::Sim;
                Ok(())
            }
            mode => Err(SimError::IllegalMode {
                op: "begin_sim",
                mode,
            }),
        }
    }

    /// Mark the run complete. Further movement events are rejected.
    pub fn complete(&mut self) {
        if self.mode == RunMode::Sim {
            self.mode = RunMode::SimComplete;
        }
    }

    /// Apply a batch of events, resolving each independently and in input
    /// order, and return the resulting events.
    pub fn apply(&mut self, events: &[Event]) -> Vec<Event> {
        let mut results = Vec::new();
        for event in events {
            trace!(event = event.name(), "applying event");
            match event {
                Event::ObstacleAdded { rect, .. } => self.apply_obstacle(*rect, &mut results),
                Event::RobotPlaced {
                    position, radius, ..
                } => self.apply_robot_placed(*position, *radius, &mut results),
                Event::RobotMoved { delta, heading } => {
                    self.apply_robot_moved(*delta, *heading, &mut results)
                }
                Event::ObstaclesCleared => self.apply_clear(&mut results),
                // Result-only events are not commands; nothing to do.
                Event::CollisionDetected { .. }
                | Event::TileCovered { .. }
                | Event::AlgorithmStalled { .. } => {}
            }
        }
        results
    }

    fn apply_obstacle(&mut self, rect: Rect, results: &mut Vec<Event>) {
        let accepted = self.mode == RunMode::Build && self.obstacle_fits(&rect);
        if accepted {
            self.obstacles.push(rect);
            self.grid.set_blocked(&self.obstacles);
            debug!(x = rect.x, y = rect.y, w = rect.width, h = rect.height, "obstacle added");
        } else {
            warn!(x = rect.x, y = rect.y, w = rect.width, h = rect.height, mode = ?self.mode, "obstacle rejected");
        }
        results.push(Event::ObstacleAdded { rect, accepted });
    }

    fn obstacle_fits(&self, rect: &Rect) -> bool {
        if rect.width <= 0.0 || rect.height <= 0.0 || !self.bounds.contains_rect(rect) {
            return false;
        }
        if self.obstacles.iter().any(|o| o.overlaps(rect)) {
            return false;
        }
        match &self.robot {
            Some(robot) => !robot.footprint().intersects_rect(rect),
            None => true,
        }
    }

    fn apply_robot_placed(&mut self, position: Vec2, radius: f32, results: &mut Vec<Event>) {
        let circle = Circle::new(position, radius);
        let accepted = self.mode == RunMode::Build
            && radius > 0.0
            && circle.inside_rect(&self.bounds)
            && !self.obstacles.iter().any(|o| circle.intersects_rect(o));
        results.push(Event::RobotPlaced {
            position,
            radius,
            accepted,
        });
        if !accepted {
            warn!(x = position.x, y = position.y, radius, mode = ?self.mode, "robot placement rejected");
            return;
        }
        let mut robot = Robot::new(position, radius, self.params.robot_speed);
        for (col, row) in self.grid.cover_footprint(&circle) {
            robot.dirt_collected += self.params.dirt_per_cover as u64;
            results.push(Event::TileCovered {
                col,
                row,
                dirt: self.params.dirt_per_cover,
            });
        }
        debug!(x = position.x, y = position.y, radius, "robot placed");
        self.robot = Some(robot);
    }

    fn apply_robot_moved(&mut self, delta: Vec2, heading: f32, results: &mut Vec<Event>) {
        if self.mode != RunMode::Sim {
            debug!(mode = ?self.mode, "movement ignored outside SIM mode");
            return;
        }
        let Some(robot) = self.robot.as_mut() else {
            return;
        };
        let candidate = robot.position + delta;
        let footprint = robot.footprint_at(candidate);

        if let Some(normal) = collision_normal(&self.bounds, &self.obstacles, &footprint) {
            debug!(nx = normal.x, ny = normal.y, "collision detected");
            results.push(Event::CollisionDetected { normal });
            return;
        }

        robot.position = candidate;
        robot.heading = heading;
        for (col, row) in self.grid.cover_footprint(&footprint) {
            robot.dirt_collected += self.params.dirt_per_cover as u64;
            results.push(Event::TileCovered {
                col,
                row,
                dirt: self.params.dirt_per_cover,
            });
        }
        results.push(Event::RobotMoved { delta, heading });
    }

    fn apply_clear(&mut self, results: &mut Vec<Event>) {
        if self.mode != RunMode::Build {
            warn!(mode = ?self.mode, "clear_obstacles rejected outside BUILD mode");
            return;
        }
        self.obstacles.clear();
        self.grid.set_blocked(&[]);
        self.grid.reset();
        debug!("obstacles cleared, grid reset");
        results.push(Event::ObstaclesCleared);
    }
}

/// Contact normal for a robot footprint against the room walls and the
/// obstacle list, or `None` when the position is legal.
///
/// Wall contacts produce inward normals; corner contacts combine both
/// axes. Obstacle contacts use the clamped-point normal of the first
/// intersecting obstacle.
pub fn collision_normal(bounds: &Rect, obstacles: &[Rect], footprint: &Circle) -> Option<Vec2> {
    if !footprint.inside_rect(bounds) {
        let mut normal = Vec2::ZERO;
        if footprint.center.x - footprint.radius < bounds.x {
            normal.x += 1.0;
        }
        if footprint.center.x + footprint.radius > bounds.right() {
            normal.x -= 1.0;
        }
        if footprint.center.y - footprint.radius < bounds.y {
            normal.y += 1.0;
        }
        if footprint.center.y + footprint.radius > bounds.bottom() {
            normal.y -= 1.0;
        }
        return Some(normal.normalize());
    }
    obstacles
        .iter()
        .find(|o| footprint.intersects_rect(o))
        .map(|o| footprint.contact_normal(o))
}
