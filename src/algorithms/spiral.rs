//! Spiral walk: outward Archimedean spiral, bounce fallback.

use crate::core::{Rect, Robot, Vec2};
use crate::events::Event;

use super::{step_blocked, MotionAlgorithm, RandomBounceWalk};

/// Ring spacing as a fraction of the robot diameter. Below 1.0 the rings
/// overlap, leaving no uncleaned gap between passes.
const RING_SPACING_FACTOR: f32 = 0.8;

enum Phase {
    /// Spiral not yet anchored; waits for the first update to read the
    /// robot's starting pose.
    Start,
    /// Following the spiral r = b * theta around `center`.
    Spiraling { center: Vec2, theta: f32, b: f32 },
    /// Spiral ended (contact or room bounding radius); bounce from here on.
    Fallback(RandomBounceWalk),
}

/// Spiral walk.
///
/// Anchors an outward Archimedean spiral at the robot's pose on the first
/// tick and follows it point by point, each step one tick's travel along
/// the arc. The spiral phase ends permanently when the next point is
/// blocked or the radius exceeds the room's bounding radius; movement then
/// delegates to an embedded [`RandomBounceWalk`].
pub struct SpiralWalk {
    bounds: Rect,
    rotation_step_deg: f32,
    seed: Option<u64>,
    phase: Phase,
}

impl SpiralWalk {
    /// Create a spiral walker for a room; `rotation_step_deg` and `seed`
    /// configure the bounce fallback.
    pub fn new(bounds: Rect, rotation_step_deg: f32, seed: Option<u64>) -> Self {
        Self {
            bounds,
            rotation_step_deg,
            seed,
            phase: Phase::Start,
        }
    }

    /// Whether the spiral phase has ended.
    pub fn in_fallback(&self) -> bool {
        matches!(self.phase, Phase::Fallback(_))
    }

    fn bounding_radius(&self) -> f32 {
        Vec2::new(self.bounds.width, self.bounds.height).length() / 2.0
    }
}

impl MotionAlgorithm for SpiralWalk {
    fn name(&self) -> &'static str {
        "spiral"
    }

    fn update(&mut self, obstacles: &[Rect], robot: &Robot, feedback: &[Event]) -> Vec<Event> {
        if let Phase::Start = self.phase {
            let spacing = 2.0 * robot.radius * RING_SPACING_FACTOR;
            self.phase = Phase::Spiraling {
                center: robot.position,
                theta: 0.0,
                b: spacing / (2.0 * std::f32::consts::PI),
            };
        }

        if let Phase::Fallback(walk) = &mut self.phase {
            return walk.update(obstacles, robot, feedback);
        }

        let (center, theta, b) = match &self.phase {
            Phase::Spiraling { center, theta, b } => (*center, *theta, *b),
            _ => unreachable!(),
        };

        // Advance so the chord to the next spiral point is one step;
        // sqrt(r^2 + b^2) is the local travel rate per radian, so this
        // holds from the very first tick at r = 0.
        let r = b * theta;
        let d_theta = robot.speed / (r * r + b * b).sqrt();
        let next_theta = theta + d_theta;
        let next_r = b * next_theta;
        let next = center + Vec2::from_angle(next_theta) * next_r;
        let delta = next - robot.position;

        let fits = next_r <= self.bounding_radius()
            && !step_blocked(&self.bounds, obstacles, robot, delta);
        if fits {
            self.phase = Phase::Spiraling {
                center,
                theta: next_theta,
                b,
            };
            return vec![Event::move_robot(delta)];
        }

        // Spiral phase over, permanently
        let mut walk = RandomBounceWalk::new(self.bounds, self.rotation_step_deg, self.seed);
        let events = walk.update(obstacles, robot, feedback);
        self.phase = Phase::Fallback(walk);
        events
    }
}
