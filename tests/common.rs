//! Shared helpers for ShuddhiSim integration tests.

#![allow(dead_code)]

use shuddhi_sim::{LayoutConfig, SimConfig, Simulation};

/// Default configuration shrunk to a small room so coverage runs finish
/// quickly. Adds a `test` layout with the robot in the top-left corner.
pub fn compact_config(width: f32, height: f32) -> SimConfig {
    let mut config = SimConfig::default();
    config.environment.width = width;
    config.environment.height = height;
    config.environment.defaults.insert(
        "test".to_string(),
        LayoutConfig {
            name: "Test Room".to_string(),
            obstacles: Vec::new(),
            robot: Some([35.0, 35.0, 30.0]),
        },
    );
    config
}

/// Step a started simulation until it reports completion or `limit` ticks
/// have elapsed. Returns `true` when the run completed.
pub fn run_to_completion(sim: &mut Simulation, limit: u64) -> bool {
    for _ in 0..limit {
        let (keep_running, _) = sim.step().expect("step failed");
        if !keep_running {
            return true;
        }
    }
    false
}
