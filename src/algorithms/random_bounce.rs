//! Random-bounce walk: straight lines, reflected headings on contact.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{normalize_angle, Rect, Robot, Vec2};
use crate::events::Event;

use super::{step_blocked, step_normal, MotionAlgorithm};

/// Resampling attempts around the reflection before giving up on the cone
/// and falling back to uniform headings.
const REFLECT_RETRIES: u32 = 12;
/// Uniform-heading attempts after the reflection cone is exhausted.
const UNIFORM_RETRIES: u32 = 24;

/// Random-bounce walk.
///
/// Holds a current heading and proposes one forward step per tick. After a
/// collision (reported in the previous tick's feedback, or found by the
/// own pre-check) the heading is resampled inside a cone around the mirror
/// reflection of the blocked direction, widening by `rotation_step_deg`
/// per retry. Every sample is pre-checked, so the next proposed step never
/// re-enters the geometry that triggered the bounce.
pub struct RandomBounceWalk {
    bounds: Rect,
    rotation_step: f32,
    heading: Option<f32>,
    rng: StdRng,
}

impl RandomBounceWalk {
    /// Create a walker for a room. `seed` fixes the heading stream.
    pub fn new(bounds: Rect, rotation_step_deg: f32, seed: Option<u64>) -> Self {
        Self {
            bounds,
            rotation_step: rotation_step_deg.to_radians(),
            heading: None,
            rng: match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            },
        }
    }

    fn step(&self, robot: &Robot, heading: f32) -> Vec2 {
        Vec2::from_angle(heading) * robot.speed
    }

    /// Sample a legal heading starting from the reflection of `blocked`
    /// about `normal`, widening the jitter cone per attempt.
    fn bounce(&mut self, obstacles: &[Rect], robot: &Robot, blocked: f32, normal: Vec2) -> Option<f32> {
        let reflected = Vec2::from_angle(blocked).reflect(&normal).angle();
        for attempt in 1..=REFLECT_RETRIES {
            let cone = self.rotation_step * attempt as f32;
            let candidate = normalize_angle(reflected + self.rng.gen_range(-cone..=cone));
            if !step_blocked(&self.bounds, obstacles, robot, self.step(robot, candidate)) {
                return Some(candidate);
            }
        }
        for _ in 0..UNIFORM_RETRIES {
            let candidate = self
                .rng
                .gen_range(-std::f32::consts::PI..std::f32::consts::PI);
            if !step_blocked(&self.bounds, obstacles, robot, self.step(robot, candidate)) {
                return Some(candidate);
            }
        }
        None
    }
}

impl MotionAlgorithm for RandomBounceWalk {
    fn name(&self) -> &'static str {
        "random_bounce"
    }

    fn update(&mut self, obstacles: &[Rect], robot: &Robot, feedback: &[Event]) -> Vec<Event> {
        let mut heading = *self.heading.get_or_insert_with(|| {
            // First tick: no momentum to reflect, any direction will do
            robot.heading
        });

        // React to the environment's verdict from the previous tick
        if let Some(Event::CollisionDetected { normal }) = feedback
            .iter()
            .find(|e| matches!(e, Event::CollisionDetected { .. }))
        {
            match self.bounce(obstacles, robot, heading, *normal) {
                Some(h) => heading = h,
                None => return Vec::new(),
            }
        }

        // Pre-check the forward step; bounce off whatever blocks it
        if let Some(normal) = step_normal(&self.bounds, obstacles, robot, self.step(robot, heading))
        {
            match self.bounce(obstacles, robot, heading, normal) {
                Some(h) => heading = h,
                None => return Vec::new(),
            }
        }

        self.heading = Some(heading);
        vec![Event::move_robot(self.step(robot, heading))]
    }
}
