#![allow(dead_code)]

use gridsim::planner::{ObstacleRequest, PlanResponse, Planner};
use gridsim::{Direction, Grid, GridPos, PlannerError, Simulator, SimulatorOptions};

/// Planner stand-in that answers with canned responses and records every request
pub struct ScriptedPlanner {
    responses: Vec<Result<PlanResponse, PlannerError>>,
    pub requests: Vec<Vec<ObstacleRequest>>,
}

impl ScriptedPlanner {
    pub fn new() -> Self {
        ScriptedPlanner {
            responses: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Queue a successful response with the given positions
    pub fn then_path(mut self, path: &[&str]) -> Self {
        self.responses.push(Ok(PlanResponse {
            path: path.iter().map(|s| s.to_string()).collect(),
            cost: Some(10.0 * path.len().saturating_sub(1) as f64),
        }));
        self
    }

    /// Queue a failure
    pub fn then_error(mut self, error: PlannerError) -> Self {
        self.responses.push(Err(error));
        self
    }
}

impl Planner for ScriptedPlanner {
    fn compute_path(&mut self, request: &[ObstacleRequest]) -> Result<PlanResponse, PlannerError> {
        self.requests.push(request.to_vec());
        if self.responses.is_empty() {
            return Err(PlannerError::Transport("no scripted response left".to_string()));
        }
        self.responses.remove(0)
    }
}

/// Parse an obstacle layout, top row first.
/// Format:
/// - N/S/E/W: obstacle center facing that way
/// - any other character: nothing placed
pub fn parse_layout(layout: &str) -> Vec<(GridPos, Direction)> {
    let rows: Vec<&str> = layout
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();
    let height = rows.len() as i32;

    let mut obstacles = Vec::new();
    for (i, line) in rows.iter().enumerate() {
        for (j, ch) in line.chars().enumerate() {
            if let Ok(direction) = ch.to_string().parse::<Direction>() {
                obstacles.push((GridPos::new(j as i32, height - 1 - i as i32), direction));
            }
        }
    }
    obstacles
}

/// Simulator on a grid sized to the layout, with every obstacle placed
pub fn simulator_from_layout(layout: &str, options: SimulatorOptions) -> Simulator {
    let size = layout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count() as i32;
    let mut sim = Simulator::new(Grid::new(size), options);
    for (pos, direction) in parse_layout(layout) {
        sim.place_obstacle(pos.x, pos.y, direction)
            .unwrap_or_else(|e| panic!("layout obstacle at ({}, {}) rejected: {}\n{}", pos.x, pos.y, e, sim.to_ascii()));
    }
    sim
}
