use crate::error::{DirectionParseError, PlacementError};
use crate::grid::{Grid, GridPos};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Facing direction of an obstacle's image side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    S,
    E,
    W,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::N, Direction::S, Direction::E, Direction::W];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::S => "S",
            Direction::E => "E",
            Direction::W => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Direction::N),
            "S" => Ok(Direction::S),
            "E" => Ok(Direction::E),
            "W" => Ok(Direction::W),
            _ => Err(DirectionParseError(s.to_string())),
        }
    }
}

/// What a cell of the occupancy map holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Obstacle center, rendered with a border on its facing side
    Facing(Direction),
    /// Reserved clearance around an obstacle; invisible but blocks placement
    Virtual,
}

impl Marker {
    pub fn is_virtual(&self) -> bool {
        matches!(self, Marker::Virtual)
    }
}

/// A real obstacle as placed by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    pub center: GridPos,
    pub direction: Direction,
}

/// How a placement treats footprint neighbours that are already occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Leave occupied neighbours untouched and stamp the rest
    #[default]
    Skip,
    /// Refuse the whole placement with `FootprintConflict`
    Reject,
}

/// Owns the occupancy map: obstacle centers plus their virtual 3x3 clearance.
#[derive(Debug, Clone)]
pub struct ObstacleRegistry {
    grid: Grid,
    policy: OverlapPolicy,
    cells: HashMap<GridPos, Marker>,
    obstacles: Vec<Obstacle>,
}

impl ObstacleRegistry {
    pub fn new(grid: Grid) -> Self {
        Self::with_policy(grid, OverlapPolicy::default())
    }

    pub fn with_policy(grid: Grid, policy: OverlapPolicy) -> Self {
        ObstacleRegistry {
            grid,
            policy,
            cells: HashMap::new(),
            obstacles: Vec::new(),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Place an obstacle centered on (x, y) facing `direction`.
    ///
    /// The center must leave room for the whole 3x3 footprint and must not
    /// already be occupied. Neighbours that are already occupied are kept as
    /// they are under `OverlapPolicy::Skip`, or reject the placement under
    /// `OverlapPolicy::Reject`.
    pub fn place(&mut self, x: i32, y: i32, direction: Direction) -> Result<(), PlacementError> {
        let center = GridPos::new(x, y);

        if !self.grid.footprint_fits(center) {
            return Err(PlacementError::OutOfFootprintBounds { x, y });
        }
        if self.cells.contains_key(&center) {
            return Err(PlacementError::CenterOccupied { x, y });
        }

        let footprint = self.grid.footprint_cells(center);
        if self.policy == OverlapPolicy::Reject {
            if let Some(&conflict) = footprint.iter().find(|cell| self.cells.contains_key(cell)) {
                return Err(PlacementError::FootprintConflict { x, y, conflict });
            }
        }

        self.cells.insert(center, Marker::Facing(direction));
        let mut skipped = 0;
        for cell in footprint.into_iter().filter(|&cell| cell != center) {
            if self.cells.contains_key(&cell) {
                skipped += 1;
                continue;
            }
            self.cells.insert(cell, Marker::Virtual);
        }
        if skipped > 0 {
            debug!("obstacle ({}, {}): {} footprint cells already reserved, left untouched", x, y, skipped);
        }

        self.obstacles.push(Obstacle { center, direction });
        info!("placed obstacle at ({}, {}) facing {}", x, y, direction);
        Ok(())
    }

    /// Clear every obstacle and its reserved cells
    pub fn reset(&mut self) {
        self.cells.clear();
        self.obstacles.clear();
        info!("obstacle registry reset");
    }

    /// Marker stored at (x, y), if any
    pub fn occupancy_at(&self, x: i32, y: i32) -> Option<Marker> {
        self.cells.get(&GridPos::new(x, y)).copied()
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Number of real obstacles placed since the last reset
    pub fn count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Real obstacles in placement order
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}
