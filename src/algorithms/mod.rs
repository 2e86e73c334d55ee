//! Motion strategies proposing movement events each tick.
//!
//! Every strategy implements [`MotionAlgorithm`]: given the current
//! obstacle list, the robot, and the previous tick's result events, it
//! proposes the next whole-tick displacement. Strategies carry their own
//! state (heading, spiral phase, sweep lane) and never mutate the
//! environment directly.
//!
//! Each strategy pre-validates its proposal against the same geometry the
//! environment uses, so an accepted proposal is never clamped mid-step;
//! the environment's collision check stays authoritative regardless.

mod random_bounce;
mod spiral;
mod swalk;

pub use random_bounce::RandomBounceWalk;
pub use spiral::SpiralWalk;
pub use swalk::SWalk;

use crate::core::{Rect, Robot, Vec2};
use crate::environment::collision_normal;
use crate::events::Event;
use serde::{Deserialize, Serialize};

/// A pluggable motion strategy.
pub trait MotionAlgorithm {
    /// Name of this strategy for logging.
    fn name(&self) -> &'static str;

    /// Propose movement events for the next tick.
    ///
    /// `feedback` is the previous tick's result events; strategies react
    /// to [`Event::CollisionDetected`] found there. Returning no events is
    /// legal and surfaces as a stall through the driver.
    fn update(&mut self, obstacles: &[Rect], robot: &Robot, feedback: &[Event]) -> Vec<Event>;
}

/// Strategy selector, fixed at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    /// Random-bounce walk: straight lines with reflected headings
    #[value(name = "random")]
    #[serde(rename = "random")]
    RandomBounce,
    /// Outward spiral from the starting pose, bounce fallback
    Spiral,
    /// Serpentine row-by-row sweep
    #[value(name = "swalk")]
    SWalk,
}

impl AlgorithmKind {
    /// Instantiate the strategy for a room.
    ///
    /// `rotation_step_deg` is the heading-sampling granularity for the
    /// bounce walk (config key `rss`); `seed` fixes the random stream for
    /// reproducible runs.
    pub fn build(
        self,
        bounds: Rect,
        rotation_step_deg: f32,
        seed: Option<u64>,
    ) -> Box<dyn MotionAlgorithm> {
        match self {
            AlgorithmKind::RandomBounce => {
                Box::new(RandomBounceWalk::new(bounds, rotation_step_deg, seed))
            }
            AlgorithmKind::Spiral => Box::new(SpiralWalk::new(bounds, rotation_step_deg, seed)),
            AlgorithmKind::SWalk => Box::new(SWalk::new(bounds)),
        }
    }
}

/// Whether a whole-tick displacement would collide with a wall or any
/// obstacle. Shared pre-check mirroring the environment's resolution.
pub(crate) fn step_blocked(bounds: &Rect, obstacles: &[Rect], robot: &Robot, delta: Vec2) -> bool {
    let footprint = robot.footprint_at(robot.position + delta);
    collision_normal(bounds, obstacles, &footprint).is_some()
}

/// Contact normal the displacement would produce, if any.
pub(crate) fn step_normal(
    bounds: &Rect,
    obstacles: &[Rect],
    robot: &Robot,
    delta: Vec2,
) -> Option<Vec2> {
    let footprint = robot.footprint_at(robot.position + delta);
    collision_normal(bounds, obstacles, &footprint)
}
