//! Error types for the simulation core.

use crate::grid::GridPos;
use thiserror::Error;

/// Reasons an obstacle placement is refused. The registry is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The 3x3 footprint around the center would leave the arena.
    #[error("obstacle at ({x}, {y}) is too close to the edge for its 3x3 footprint")]
    OutOfFootprintBounds { x: i32, y: i32 },

    /// The center cell already holds a real or virtual marker.
    #[error("cell ({x}, {y}) is already occupied")]
    CenterOccupied { x: i32, y: i32 },

    /// A footprint cell overlaps an existing footprint (only under `OverlapPolicy::Reject`).
    #[error("footprint of ({x}, {y}) overlaps an existing obstacle at ({}, {})", .conflict.x, .conflict.y)]
    FootprintConflict { x: i32, y: i32, conflict: GridPos },
}

/// Free-drive move refusals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The robot footprint at the target anchor would cover an obstacle cell.
    #[error("move to ({}, {}) blocked by obstacle at ({}, {})", .target.x, .target.y, .blocker.x, .blocker.y)]
    BlockedByObstacle { target: GridPos, blocker: GridPos },
}

/// Failure to decode a `Letter-Number` position string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionParseError {
    #[error("empty position string")]
    Empty,

    #[error("invalid column letter '{0}'")]
    InvalidColumn(char),

    #[error("invalid row number in '{0}'")]
    InvalidRow(String),

    #[error("position '{0}' is outside the grid")]
    OutOfGrid(String),

    #[error("column {0} has no letter")]
    ColumnOutOfRange(i32),
}

/// Unknown obstacle facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction '{0}'")]
pub struct DirectionParseError(pub String);

/// Anything that goes wrong at the planner boundary.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("planner transport failed: {0}")]
    Transport(String),

    #[error("planner returned status {0}")]
    Status(u16),

    #[error("malformed planner response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("planner returned an empty path")]
    EmptyPath,

    #[error("planner returned a bad position: {0}")]
    BadPosition(#[from] PositionParseError),

    #[error("failed to read planner response: {0}")]
    Io(#[from] std::io::Error),
}

/// Session-level errors surfaced to the operator.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("add at least one obstacle before starting the simulation")]
    EmptyObstacleSet,

    #[error("an error occurred while computing the path: {0}")]
    PlannerRequestFailed(#[from] PlannerError),

    #[error("a path request is already in flight")]
    RequestInFlight,

    #[error("no path request is in flight")]
    NoRequestInFlight,

    #[error("simulation has not started")]
    NotStarted,

    #[error("operation is not available in {0} mode")]
    WrongMode(&'static str),
}

/// Configuration file problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_cell() {
        let err = PlacementError::CenterOccupied { x: 3, y: 4 };
        assert_eq!(err.to_string(), "cell (3, 4) is already occupied");

        let err = PlacementError::FootprintConflict { x: 5, y: 5, conflict: GridPos::new(6, 6) };
        assert!(err.to_string().contains("(6, 6)"));
    }

    #[test]
    fn test_sim_error_wraps_placement() {
        let err: SimError = PlacementError::OutOfFootprintBounds { x: 0, y: 0 }.into();
        assert!(matches!(err, SimError::Placement(PlacementError::OutOfFootprintBounds { .. })));
    }

    #[test]
    fn test_direction_error_quotes_input() {
        let err = DirectionParseError("NE".to_string());
        assert_eq!(err.to_string(), "unknown direction 'NE'");
    }
}
