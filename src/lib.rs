//! # ShuddhiSim
//!
//! Simulation engine for an autonomous cleaning robot exploring a
//! rectangular room with rectangular obstacles, tracking covered floor
//! area under pluggable motion strategies.
//!
//! ## Overview
//!
//! - **Geometry** ([`core`]): circle/rect intersection and bounds tests
//! - **Tile grid** ([`grid`]): per-tile coverage and cleanliness accounting
//! - **Environment** ([`environment`]): obstacles, robot, and collision
//!   resolution, mutated only through events
//! - **Algorithms** ([`algorithms`]): random-bounce, spiral, and
//!   serpentine-sweep motion strategies
//! - **Driver** ([`sim`]): BUILD/SIM run-mode machine, tick loop, and
//!   coverage statistics
//!
//! ## Quick Start
//!
//! ```rust
//! use shuddhi_sim::{AlgorithmKind, SimConfig, Simulation};
//!
//! let config = SimConfig::default();
//! let mut sim = Simulation::from_config(&config, "1", AlgorithmKind::SWalk, Some(7)).unwrap();
//! sim.start_simulation().unwrap();
//!
//! let (keep_running, events) = sim.step().unwrap();
//! println!("coverage after one tick: {:.1}%", sim.coverage());
//! # let _ = (keep_running, events);
//! ```
//!
//! ## Event protocol
//!
//! Motion algorithms never touch the environment directly: each tick they
//! propose [`Event::RobotMoved`](events::Event::RobotMoved) displacements,
//! the environment resolves them against walls and obstacles, and the
//! resulting events (move echoes, collisions, covered tiles) feed back to
//! the algorithm on the next tick.

pub mod algorithms;
pub mod config;
pub mod core;
pub mod environment;
pub mod error;
pub mod events;
pub mod grid;
pub mod sim;

pub use algorithms::{AlgorithmKind, MotionAlgorithm, RandomBounceWalk, SWalk, SpiralWalk};
pub use config::{LayoutConfig, SimConfig};
pub use core::{Circle, Rect, Robot, Vec2};
pub use environment::{EnvParams, RoomEnvironment};
pub use error::{Result, SimError};
pub use events::Event;
pub use grid::{TileGrid, TileState};
pub use sim::{RunMode, SimSnapshot, Simulation};
