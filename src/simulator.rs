use crate::error::{PlannerError, SimError};
use crate::grid::{DisplayIndex, Grid, GridPos};
use crate::motion::{robot_covers, MoveDirection, RobotMotionController};
use crate::obstacle::{Direction, Marker, ObstacleRegistry, OverlapPolicy};
use crate::path::{PathController, PlaybackState};
use crate::planner::{build_request, ObstacleRequest, PlanResponse, Planner};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Which controller drives the robot in this session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Step through a planner path
    #[default]
    #[serde(rename = "path")]
    PathPlayback,
    /// Drive the robot directly, one cell per command
    #[serde(rename = "free_drive")]
    FreeDrive,
}

impl SimulationMode {
    pub fn name(&self) -> &'static str {
        match self {
            SimulationMode::PathPlayback => "path playback",
            SimulationMode::FreeDrive => "free drive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulatorOptions {
    pub mode: SimulationMode,
    pub overlap_policy: OverlapPolicy,
    /// Refuse free-drive moves whose footprint would cover an occupied cell
    pub collision_check: bool,
}

/// What a single display cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Empty,
    Robot,
    Obstacle(Direction),
    Reserved,
}

impl CellView {
    /// Symbol used in the text export
    pub fn symbol(&self) -> char {
        match self {
            CellView::Empty => '□',
            CellView::Robot => 'r',
            CellView::Reserved => '■',
            CellView::Obstacle(Direction::N) => 'N',
            CellView::Obstacle(Direction::S) => 'S',
            CellView::Obstacle(Direction::E) => 'E',
            CellView::Obstacle(Direction::W) => 'W',
        }
    }
}

/// One simulation session: obstacles, the loaded path and the robot.
///
/// Every mutation is a synchronous call; the only suspension point is the
/// planner request, bracketed by `begin_plan_request` / `complete_plan_request`.
#[derive(Debug, Clone)]
pub struct Simulator {
    grid: Grid,
    options: SimulatorOptions,
    obstacles: ObstacleRegistry,
    playback: PathController,
    motion: RobotMotionController,
    started: bool,
    request_in_flight: bool,
    last_cost: Option<f64>,
}

impl Simulator {
    pub fn new(grid: Grid, options: SimulatorOptions) -> Self {
        Simulator {
            grid,
            options,
            obstacles: ObstacleRegistry::with_policy(grid, options.overlap_policy),
            playback: PathController::new(),
            motion: RobotMotionController::new(grid),
            started: false,
            request_in_flight: false,
            last_cost: None,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn mode(&self) -> SimulationMode {
        self.options.mode
    }

    pub fn options(&self) -> SimulatorOptions {
        self.options
    }

    pub fn obstacles(&self) -> &ObstacleRegistry {
        &self.obstacles
    }

    pub fn path(&self) -> &PathController {
        &self.playback
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn request_in_flight(&self) -> bool {
        self.request_in_flight
    }

    /// Cost reported by the planner for the loaded path
    pub fn last_cost(&self) -> Option<f64> {
        self.last_cost
    }

    /// Switch driving mode. The robot and any loaded path start over; obstacles stay.
    pub fn set_mode(&mut self, mode: SimulationMode) {
        if mode == self.options.mode {
            return;
        }
        self.options.mode = mode;
        self.clear_session();
        info!("switched to {} mode", mode.name());
    }

    pub fn place_obstacle(&mut self, x: i32, y: i32, direction: Direction) -> Result<(), SimError> {
        self.obstacles.place(x, y, direction)?;
        Ok(())
    }

    /// Clear obstacles, path and robot. Not reversible.
    pub fn reset(&mut self) {
        self.obstacles.reset();
        self.clear_session();
        info!("grid reset");
    }

    fn clear_session(&mut self) {
        self.playback.clear();
        self.motion.reset();
        self.started = false;
        self.request_in_flight = false;
        self.last_cost = None;
    }

    /// Build the planner request and mark it in flight.
    pub fn begin_plan_request(&mut self) -> Result<Vec<ObstacleRequest>, SimError> {
        if self.options.mode != SimulationMode::PathPlayback {
            return Err(SimError::WrongMode(self.options.mode.name()));
        }
        if self.request_in_flight {
            return Err(SimError::RequestInFlight);
        }
        if self.obstacles.is_empty() {
            return Err(SimError::EmptyObstacleSet);
        }
        let request = build_request(self.obstacles.obstacles()).map_err(PlannerError::from)?;
        self.request_in_flight = true;
        info!("requesting path for {} obstacles", self.obstacles.count());
        Ok(request)
    }

    /// Consume the outcome of the outstanding planner request.
    ///
    /// On failure nothing is loaded and the previous playback state is kept.
    pub fn complete_plan_request(
        &mut self,
        outcome: Result<PlanResponse, PlannerError>,
    ) -> Result<PlaybackState, SimError> {
        if !self.request_in_flight {
            return Err(SimError::NoRequestInFlight);
        }
        self.request_in_flight = false;

        let (positions, cost) = match outcome.and_then(|response| Ok((response.decode(&self.grid)?, response.cost))) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("planner request failed: {}", e);
                return Err(SimError::PlannerRequestFailed(e));
            }
        };

        self.motion.reset();
        self.playback
            .load_path(positions)
            .map_err(|_| SimError::PlannerRequestFailed(PlannerError::EmptyPath))?;
        self.last_cost = cost;
        self.started = true;
        info!(
            "simulation started: {} steps{}",
            self.playback.max_step_index(),
            cost.map(|c| format!(", cost {}", c)).unwrap_or_default()
        );
        Ok(self.playback_state())
    }

    /// Drop the outstanding request; a late result must not be applied
    pub fn abandon_plan_request(&mut self) {
        if self.request_in_flight {
            info!("discarding outstanding path request");
        }
        self.request_in_flight = false;
    }

    /// Request a path and load it in one synchronous call
    pub fn start_simulation(&mut self, planner: &mut dyn Planner) -> Result<PlaybackState, SimError> {
        let request = self.begin_plan_request()?;
        let outcome = planner.compute_path(&request);
        self.complete_plan_request(outcome)
    }

    /// Advance along the path. `Ok(None)` means already at the last step.
    /// Refused while a path request is outstanding.
    pub fn step_forward(&mut self) -> Result<Option<GridPos>, SimError> {
        self.ensure_playback()?;
        Ok(self.playback.step_forward().ok())
    }

    /// Go back along the path. `Ok(None)` means already at the first step.
    pub fn step_backward(&mut self) -> Result<Option<GridPos>, SimError> {
        self.ensure_playback()?;
        Ok(self.playback.step_backward().ok())
    }

    fn ensure_playback(&self) -> Result<(), SimError> {
        if self.options.mode != SimulationMode::PathPlayback {
            return Err(SimError::WrongMode(self.options.mode.name()));
        }
        if !self.started {
            return Err(SimError::NotStarted);
        }
        if self.request_in_flight {
            return Err(SimError::RequestInFlight);
        }
        Ok(())
    }

    /// Free-drive move of the robot anchor
    pub fn move_robot(&mut self, direction: MoveDirection) -> Result<GridPos, SimError> {
        if self.options.mode != SimulationMode::FreeDrive {
            return Err(SimError::WrongMode(self.options.mode.name()));
        }
        let anchor = if self.options.collision_check {
            self.motion.move_checked(direction, &self.obstacles)?
        } else {
            self.motion.move_to(direction)
        };
        Ok(anchor)
    }

    /// Lower-left corner of the robot footprint, as published by the active controller
    pub fn robot_anchor(&self) -> GridPos {
        match self.options.mode {
            SimulationMode::PathPlayback => self
                .playback
                .current_position()
                .unwrap_or_else(|| self.motion.anchor()),
            SimulationMode::FreeDrive => self.motion.anchor(),
        }
    }

    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState {
            current_step_index: self.playback.current_step_index(),
            max_step_index: self.playback.max_step_index(),
            started: self.started,
        }
    }

    pub fn progress_fraction(&self) -> f64 {
        self.playback.progress_fraction()
    }

    /// What the display cell at `index` shows. Real obstacles draw over the robot,
    /// the robot draws over reserved clearance.
    pub fn cell_view(&self, index: DisplayIndex) -> CellView {
        let pos = self.grid.to_grid(index);
        match self.obstacles.occupancy_at(pos.x, pos.y) {
            Some(Marker::Facing(direction)) => CellView::Obstacle(direction),
            marker => {
                if robot_covers(self.robot_anchor(), pos) {
                    CellView::Robot
                } else if marker.is_some() {
                    CellView::Reserved
                } else {
                    CellView::Empty
                }
            }
        }
    }

    /// Text rendering of the whole grid, top row first
    pub fn to_ascii(&self) -> String {
        let mut result = String::new();
        for row in 0..self.grid.size {
            for col in 0..self.grid.size {
                result.push(self.cell_view(DisplayIndex::new(row, col)).symbol());
            }
            result.push('\n');
        }
        result
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Simulator::new(Grid::default(), SimulatorOptions::default())
    }
}
