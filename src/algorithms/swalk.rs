//! Serpentine sweep (S-walk): row-by-row lanes across the room.

use crate::core::{Rect, Robot, Vec2};
use crate::events::Event;

use super::{step_blocked, MotionAlgorithm};

#[derive(Clone, Copy, Debug, PartialEq)]
enum LaneState {
    /// Traveling horizontally along the current lane.
    Sweep,
    /// Shifting to the next lane; `moved` pixels of the one-diameter
    /// shift already done.
    Shift { moved: f32 },
}

/// Serpentine sweep.
///
/// Moves straight along a horizontal lane until blocked, shifts vertically
/// by one robot diameter, then reverses horizontal travel to approximate
/// row-by-row full coverage. A shift blocked by the top/bottom wall
/// reverses the lane direction so the sweep retraces back across the
/// room; a shift blocked by an obstacle only reverses horizontal travel,
/// so the walker works its way around the obstacle lane by lane.
pub struct SWalk {
    bounds: Rect,
    state: LaneState,
    /// Horizontal travel direction, +1 right / -1 left
    dir_x: f32,
    /// Lane shift direction, +1 down / -1 up
    dir_shift: f32,
}

impl SWalk {
    /// Create a sweep walker for a room.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            state: LaneState::Sweep,
            dir_x: 1.0,
            dir_shift: 1.0,
        }
    }

    /// Whether a displacement would leave the room (as opposed to hitting
    /// an obstacle). Distinguishes wall-blocked from obstacle-blocked
    /// shifts.
    fn blocked_by_wall(&self, robot: &Robot, delta: Vec2) -> bool {
        step_blocked(&self.bounds, &[], robot, delta)
    }
}

impl MotionAlgorithm for SWalk {
    fn name(&self) -> &'static str {
        "swalk"
    }

    fn update(&mut self, obstacles: &[Rect], robot: &Robot, _feedback: &[Event]) -> Vec<Event> {
        let diameter = 2.0 * robot.radius;

        // A tick needs at most a few state flips (sweep end, shift end,
        // corner); bail out rather than loop if the robot is boxed in.
        for _ in 0..4 {
            match self.state {
                LaneState::Sweep => {
                    let delta = Vec2::new(self.dir_x * robot.speed, 0.0);
                    if !step_blocked(&self.bounds, obstacles, robot, delta) {
                        return vec![Event::move_robot(delta)];
                    }
                    self.state = LaneState::Shift { moved: 0.0 };
                }
                LaneState::Shift { moved } => {
                    if moved >= diameter {
                        self.dir_x = -self.dir_x;
                        self.state = LaneState::Sweep;
                        continue;
                    }
                    let step = robot.speed.min(diameter - moved);
                    let delta = Vec2::new(0.0, self.dir_shift * step);
                    if !step_blocked(&self.bounds, obstacles, robot, delta) {
                        self.state = LaneState::Shift {
                            moved: moved + step,
                        };
                        return vec![Event::move_robot(delta)];
                    }
                    if self.blocked_by_wall(robot, delta) {
                        // Hit the top/bottom wall: retrace lanes the
                        // other way
                        self.dir_shift = -self.dir_shift;
                    }
                    self.dir_x = -self.dir_x;
                    self.state = LaneState::Sweep;
                }
            }
        }
        Vec::new()
    }
}
