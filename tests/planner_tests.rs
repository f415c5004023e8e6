use gridsim::planner::{build_request, FilePlanner, Planner};
use gridsim::{Direction, Grid, GridPos, PlannerError, SimError, Simulator};
use std::fs;
use std::path::PathBuf;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("gridsim_{}_{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_file_planner_replays_response() {
    let path = temp_file("ok.json", r#"{"path": ["A-0", "A-1", "B-1"], "cost": 20.0}"#);
    let mut sim = Simulator::default();
    sim.place_obstacle(8, 8, Direction::N).unwrap();

    let mut planner = FilePlanner::new(&path);
    let state = sim.start_simulation(&mut planner).unwrap();

    assert_eq!(state.max_step_index, 2);
    assert_eq!(sim.path().path()[2], GridPos::new(1, 1));
    assert_eq!(sim.last_cost(), Some(20.0));
    fs::remove_file(path).ok();
}

#[test]
fn test_file_planner_missing_file() {
    let mut planner = FilePlanner::new(std::env::temp_dir().join("gridsim_definitely_missing.json"));
    let request = build_request(&[]).unwrap();
    assert!(matches!(planner.compute_path(&request), Err(PlannerError::Io(_))));
}

#[test]
fn test_file_planner_malformed_response() {
    let path = temp_file("bad.json", r#"{"steps": []}"#);
    let mut sim = Simulator::default();
    sim.place_obstacle(8, 8, Direction::N).unwrap();

    let mut planner = FilePlanner::new(&path);
    let err = sim.start_simulation(&mut planner).unwrap_err();
    assert!(matches!(err, SimError::PlannerRequestFailed(PlannerError::Malformed(_))));
    assert!(!sim.is_started());
    fs::remove_file(path).ok();
}

#[test]
fn test_response_outside_grid_rejected() {
    let path = temp_file("outside.json", r#"{"path": ["A-0", "H-2"]}"#);
    let mut sim = Simulator::new(Grid::new(5), Default::default());
    sim.place_obstacle(2, 2, Direction::S).unwrap();

    let mut planner = FilePlanner::new(&path);
    let err = sim.start_simulation(&mut planner).unwrap_err();
    assert!(matches!(err, SimError::PlannerRequestFailed(PlannerError::BadPosition(_))));
    assert!(!sim.path().is_loaded());
    fs::remove_file(path).ok();
}
