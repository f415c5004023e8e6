//! Boundary to the external path planner.
//!
//! The planner receives every real obstacle as `{ position, direction }` and
//! answers with the ordered anchor positions of the robot. Positions travel as
//! `Letter-Number` strings: the column letter is `'A' + x`, the number is `y`.

use crate::error::{PlannerError, PositionParseError};
use crate::grid::{Grid, GridPos};
use crate::obstacle::{Direction, Obstacle};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One obstacle entry of a planner request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRequest {
    pub position: String,
    pub direction: Direction,
}

impl TryFrom<&Obstacle> for ObstacleRequest {
    type Error = PositionParseError;

    fn try_from(obstacle: &Obstacle) -> Result<Self, Self::Error> {
        Ok(ObstacleRequest {
            position: encode_position(obstacle.center)?,
            direction: obstacle.direction,
        })
    }
}

/// Planner answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl PlanResponse {
    /// Decode every position; the path must not be empty
    pub fn decode(&self, grid: &Grid) -> Result<Vec<GridPos>, PlannerError> {
        if self.path.is_empty() {
            return Err(PlannerError::EmptyPath);
        }
        let positions = self
            .path
            .iter()
            .map(|s| parse_position(s, grid))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(positions)
    }
}

/// Grid coordinate -> `Letter-Number`. Only columns `A..=Z` have a letter.
pub fn encode_position(pos: GridPos) -> Result<String, PositionParseError> {
    if !(0..26).contains(&pos.x) {
        return Err(PositionParseError::ColumnOutOfRange(pos.x));
    }
    let letter = (b'A' + pos.x as u8) as char;
    Ok(format!("{}-{}", letter, pos.y))
}

/// `Letter-Number` or `LetterNumber` -> grid coordinate
pub fn parse_position(s: &str, grid: &Grid) -> Result<GridPos, PositionParseError> {
    let s = s.trim();
    let mut chars = s.chars();
    let letter = chars.next().ok_or(PositionParseError::Empty)?;
    if !letter.is_ascii_uppercase() {
        return Err(PositionParseError::InvalidColumn(letter));
    }
    let rest = chars.as_str();
    let number = rest.strip_prefix('-').unwrap_or(rest);
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PositionParseError::InvalidRow(s.to_string()));
    }
    let y: i32 = number
        .parse()
        .map_err(|_| PositionParseError::InvalidRow(s.to_string()))?;
    let x = letter as i32 - 'A' as i32;

    let pos = GridPos::new(x, y);
    if !grid.contains(pos) {
        return Err(PositionParseError::OutOfGrid(s.to_string()));
    }
    Ok(pos)
}

/// Build the request body for a set of obstacles
pub fn build_request(obstacles: &[Obstacle]) -> Result<Vec<ObstacleRequest>, PositionParseError> {
    obstacles.iter().map(ObstacleRequest::try_from).collect()
}

/// Anything that can turn an obstacle list into a path
pub trait Planner {
    fn compute_path(&mut self, request: &[ObstacleRequest]) -> Result<PlanResponse, PlannerError>;
}

/// Replays a planner response stored as JSON on disk
#[derive(Debug, Clone)]
pub struct FilePlanner {
    path: PathBuf,
}

impl FilePlanner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilePlanner { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Planner for FilePlanner {
    fn compute_path(&mut self, request: &[ObstacleRequest]) -> Result<PlanResponse, PlannerError> {
        debug!("request body: {}", serde_json::to_string(request)?);
        let contents = fs::read_to_string(&self.path)?;
        let response: PlanResponse = serde_json::from_str(&contents)?;
        info!(
            "loaded {} path positions from {}",
            response.path.len(),
            self.path.display()
        );
        Ok(response)
    }
}
