//! Domain events connecting motion algorithms, the environment, and
//! statistics.
//!
//! The same tagged union carries both directions of the protocol: edit and
//! movement *requests* flow into [`RoomEnvironment::apply`]
//! (crate::environment::RoomEnvironment::apply), and the environment answers
//! with *result* events: request echoes carrying an accepted flag,
//! collision notifications, and per-tile coverage events. Algorithms read
//! the previous tick's results as feedback.

use crate::core::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A simulation event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// An obstacle rectangle was requested (BUILD mode). The environment
    /// echoes it back with `accepted` resolved.
    ObstacleAdded {
        /// The obstacle rectangle in room pixels
        rect: Rect,
        /// Whether the environment accepted the placement
        accepted: bool,
    },

    /// A robot placement was requested (BUILD mode). Echoed with
    /// `accepted` resolved.
    RobotPlaced {
        /// Requested center position
        position: Vec2,
        /// Footprint radius
        radius: f32,
        /// Whether the environment accepted the placement
        accepted: bool,
    },

    /// A whole-tick displacement proposed by the active algorithm (SIM
    /// mode). The environment echoes the committed move on success or
    /// answers with [`Event::CollisionDetected`] instead.
    RobotMoved {
        /// Displacement for this tick in pixels
        delta: Vec2,
        /// Heading implied by the displacement, radians
        heading: f32,
    },

    /// A proposed move would have intersected a wall or obstacle; the
    /// robot did not move.
    CollisionDetected {
        /// Unit contact normal pointing from the collided geometry toward
        /// the robot
        normal: Vec2,
    },

    /// A tile transitioned Unvisited -> Visited this tick.
    TileCovered {
        /// Tile column
        col: u32,
        /// Tile row
        row: u32,
        /// Dirt collected for this first visit
        dirt: u32,
    },

    /// All obstacles removed and the tile grid reset (BUILD mode).
    ObstaclesCleared,

    /// The active algorithm produced no net displacement for the
    /// configured number of consecutive ticks. Non-fatal.
    AlgorithmStalled {
        /// Consecutive ticks without net movement
        ticks: u32,
    },
}

impl Event {
    /// Short tag for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Event::ObstacleAdded { .. } => "ObstacleAdded",
            Event::RobotPlaced { .. } => "RobotPlaced",
            Event::RobotMoved { .. } => "RobotMoved",
            Event::CollisionDetected { .. } => "CollisionDetected",
            Event::TileCovered { .. } => "TileCovered",
            Event::ObstaclesCleared => "ObstaclesCleared",
            Event::AlgorithmStalled { .. } => "AlgorithmStalled",
        }
    }

    /// Build an obstacle placement request.
    pub fn add_obstacle(rect: Rect) -> Event {
        Event::ObstacleAdded {
            rect,
            accepted: false,
        }
    }

    /// Build a robot placement request.
    pub fn place_robot(position: Vec2, radius: f32) -> Event {
        Event::RobotPlaced {
            position,
            radius,
            accepted: false,
        }
    }

    /// Build a movement proposal from a displacement vector.
    pub fn move_robot(delta: Vec2) -> Event {
        Event::RobotMoved {
            delta,
            heading: delta.angle(),
        }
    }
}
