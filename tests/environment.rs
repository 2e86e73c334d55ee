//! Environment integration tests: placement validation, mode gating, and
//! the clear-obstacles contract, driven through the simulation API.

mod common;

use shuddhi_sim::{AlgorithmKind, Event, SimConfig, SimError, Simulation, TileState};

fn build_sim() -> Simulation {
    let config = SimConfig::default();
    Simulation::from_config(&config, "0", AlgorithmKind::RandomBounce, Some(11)).unwrap()
}

// ============================================================================
// Placement properties
// ============================================================================

#[test]
fn valid_obstacle_increases_count_by_exactly_one() {
    let mut sim = build_sim();
    let before = sim.environment().obstacles().len();
    assert!(sim.add_obstacle(100.0, 100.0, 80.0, 60.0).unwrap());
    assert_eq!(sim.environment().obstacles().len(), before + 1);
}

#[test]
fn rejected_obstacle_leaves_state_unchanged() {
    let mut sim = build_sim();
    assert!(sim.add_obstacle(100.0, 100.0, 80.0, 60.0).unwrap());

    // Overlaps the first obstacle
    assert!(!sim.add_obstacle(150.0, 120.0, 80.0, 60.0).unwrap());
    // Pokes out of the room
    assert!(!sim.add_obstacle(780.0, 580.0, 80.0, 60.0).unwrap());
    // Degenerate
    assert!(!sim.add_obstacle(300.0, 300.0, 0.0, 60.0).unwrap());

    assert_eq!(sim.environment().obstacles().len(), 1);
}

#[test]
fn robot_overlapping_obstacle_rejected_without_state_change() {
    let mut sim = build_sim();
    assert!(sim.add_obstacle(100.0, 100.0, 80.0, 60.0).unwrap());
    let coverage_before = sim.coverage();

    // Center inside the obstacle
    assert!(!sim.place_robot(120.0, 120.0).unwrap());
    // Footprint clips the obstacle corner
    assert!(!sim.place_robot(95.0, 95.0).unwrap());

    assert!(sim.environment().robot().is_none());
    assert_eq!(sim.environment().obstacles().len(), 1);
    assert_eq!(sim.coverage(), coverage_before);
}

#[test]
fn robot_against_wall_needs_full_footprint_inside() {
    let mut sim = build_sim();
    assert!(!sim.place_robot(20.0, 300.0).unwrap());
    assert!(sim.place_robot(30.0, 300.0).unwrap());
}

// ============================================================================
// Mode gating
// ============================================================================

#[test]
fn start_without_robot_fails_and_changes_nothing() {
    let mut sim = build_sim();
    assert!(matches!(
        sim.start_simulation(),
        Err(SimError::NoRobotPlaced)
    ));
    // Still in BUILD: edits keep working
    assert!(sim.add_obstacle(200.0, 200.0, 40.0, 40.0).unwrap());
}

#[test]
fn no_transition_back_to_build() {
    let mut sim = build_sim();
    sim.place_robot(400.0, 300.0).unwrap();
    sim.start_simulation().unwrap();
    assert!(matches!(
        sim.start_simulation(),
        Err(SimError::IllegalMode { .. })
    ));
    assert!(matches!(
        sim.clear_obstacles(),
        Err(SimError::IllegalMode { .. })
    ));
}

// ============================================================================
// Clear-obstacles contract
// ============================================================================

#[test]
fn clear_preserves_robot_and_resets_tiles() {
    let mut sim = build_sim();
    sim.add_obstacle(100.0, 100.0, 80.0, 60.0).unwrap();
    sim.add_obstacle(300.0, 300.0, 80.0, 60.0).unwrap();
    sim.place_robot(600.0, 400.0).unwrap();
    let position = sim.environment().robot().unwrap().position;

    sim.clear_obstacles().unwrap();

    assert!(sim.environment().obstacles().is_empty());
    assert_eq!(sim.environment().robot().unwrap().position, position);
    assert_eq!(sim.coverage(), 0.0);
    let snap = sim.snapshot();
    assert!(snap
        .tiles
        .iter()
        .all(|t| *t == TileState::Unvisited));
}

// ============================================================================
// Layouts
// ============================================================================

#[test]
fn named_layouts_load_with_valid_geometry() {
    let config = SimConfig::default();
    for id in ["1", "2", "3", "4", "5", "6", "7", "8"] {
        let sim = Simulation::from_config(&config, id, AlgorithmKind::SWalk, None).unwrap();
        let layout = config.layout(id).unwrap();
        assert_eq!(
            sim.environment().obstacles().len(),
            layout.obstacles.len(),
            "layout {id} dropped an obstacle"
        );
        assert!(sim.environment().robot().is_some(), "layout {id} lost its robot");
        // Initial placement already covers the starting tiles
        assert!(sim
            .environment()
            .initial_events()
            .iter()
            .any(|e| matches!(e, Event::TileCovered { .. })));
    }
}

#[test]
fn unknown_layout_is_an_error() {
    let config = SimConfig::default();
    assert!(matches!(
        Simulation::from_config(&config, "99", AlgorithmKind::Spiral, None),
        Err(SimError::UnknownLayout(_))
    ));
}
