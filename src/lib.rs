pub mod config;
pub mod error;
pub mod grid;
pub mod motion;
pub mod obstacle;
pub mod path;
pub mod planner;
pub mod simulator;

pub use error::{MoveError, PlacementError, PlannerError, SimError};
pub use grid::{DisplayIndex, Grid, GridPos, GRID_SIZE};
pub use motion::{MoveDirection, RobotMotionController};
pub use obstacle::{Direction, Marker, ObstacleRegistry, OverlapPolicy};
pub use path::{NavigationNoOp, PathController, PathState, PlaybackState};
pub use planner::{FilePlanner, Planner};
pub use simulator::{CellView, SimulationMode, Simulator, SimulatorOptions};
