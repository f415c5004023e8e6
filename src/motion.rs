use crate::error::MoveError;
use crate::grid::{Grid, GridPos};
use crate::obstacle::ObstacleRegistry;
use log::debug;

/// Side length of the robot's square footprint
pub const ROBOT_SIZE: i32 = 3;

/// Free-drive command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    /// Unit step in grid coordinates
    pub fn delta(&self) -> (i32, i32) {
        match self {
            MoveDirection::Up => (0, 1),
            MoveDirection::Down => (0, -1),
            MoveDirection::Left => (-1, 0),
            MoveDirection::Right => (1, 0),
        }
    }
}

/// Cells covered by the robot whose lower-left corner sits on `anchor`, clipped to the grid
pub fn robot_footprint(grid: &Grid, anchor: GridPos) -> Vec<GridPos> {
    let mut cells = Vec::with_capacity((ROBOT_SIZE * ROBOT_SIZE) as usize);
    for dy in 0..ROBOT_SIZE {
        for dx in 0..ROBOT_SIZE {
            let cell = anchor.offset(dx, dy);
            if grid.contains(cell) {
                cells.push(cell);
            }
        }
    }
    cells
}

/// Check whether `cell` lies under the robot anchored at `anchor`
pub fn robot_covers(anchor: GridPos, cell: GridPos) -> bool {
    cell.x >= anchor.x && cell.x < anchor.x + ROBOT_SIZE && cell.y >= anchor.y && cell.y < anchor.y + ROBOT_SIZE
}

/// Moves the robot anchor one cell per command, independent of any path
#[derive(Debug, Clone)]
pub struct RobotMotionController {
    grid: Grid,
    anchor: GridPos,
}

impl RobotMotionController {
    pub fn new(grid: Grid) -> Self {
        RobotMotionController {
            grid,
            anchor: GridPos::new(0, 0),
        }
    }

    pub fn anchor(&self) -> GridPos {
        self.anchor
    }

    /// Put the robot back on the origin
    pub fn reset(&mut self) {
        self.anchor = GridPos::new(0, 0);
    }

    /// Anchor after one step in `direction`, clamped to `[0, N - 1]` on both axes
    pub fn target(&self, direction: MoveDirection) -> GridPos {
        let (dx, dy) = direction.delta();
        let max = self.grid.max_coord();
        GridPos::new(
            (self.anchor.x + dx).clamp(0, max),
            (self.anchor.y + dy).clamp(0, max),
        )
    }

    /// Move one cell without consulting obstacles
    pub fn move_to(&mut self, direction: MoveDirection) -> GridPos {
        let target = self.target(direction);
        if target == self.anchor {
            debug!("move {:?} clamped at ({}, {})", direction, target.x, target.y);
        }
        self.anchor = target;
        target
    }

    /// Move one cell, refusing when the robot footprint at the target covers an occupied cell
    pub fn move_checked(&mut self, direction: MoveDirection, obstacles: &ObstacleRegistry) -> Result<GridPos, MoveError> {
        let target = self.target(direction);
        if let Some(blocker) = robot_footprint(&self.grid, target)
            .into_iter()
            .find(|&cell| obstacles.is_occupied(cell))
        {
            return Err(MoveError::BlockedByObstacle { target, blocker });
        }
        Ok(self.move_to(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::Direction;

    #[test]
    fn test_left_clamped_at_zero() {
        let mut motion = RobotMotionController::new(Grid::default());
        motion.move_to(MoveDirection::Up);
        assert_eq!(motion.move_to(MoveDirection::Left), GridPos::new(0, 1));
        assert_eq!(motion.move_to(MoveDirection::Down), GridPos::new(0, 0));
        assert_eq!(motion.move_to(MoveDirection::Down), GridPos::new(0, 0));
    }

    #[test]
    fn test_up_right_clamped_at_max() {
        let mut motion = RobotMotionController::new(Grid::new(4));
        for _ in 0..10 {
            motion.move_to(MoveDirection::Up);
            motion.move_to(MoveDirection::Right);
        }
        assert_eq!(motion.anchor(), GridPos::new(3, 3));
    }

    #[test]
    fn test_unchecked_move_ignores_obstacles() {
        let grid = Grid::default();
        let mut registry = ObstacleRegistry::new(grid);
        registry.place(3, 1, Direction::N).unwrap();

        let mut motion = RobotMotionController::new(grid);
        assert_eq!(motion.move_to(MoveDirection::Right), GridPos::new(1, 0));
    }

    #[test]
    fn test_checked_move_blocked() {
        let grid = Grid::default();
        let mut registry = ObstacleRegistry::new(grid);
        // footprint x 3..=5, y 1..=3
        registry.place(4, 2, Direction::N).unwrap();

        let mut motion = RobotMotionController::new(grid);
        // robot at (0,0) covers x 0..=2; moving right would cover x 3
        let err = motion.move_checked(MoveDirection::Right, &registry).unwrap_err();
        assert_eq!(
            err,
            MoveError::BlockedByObstacle { target: GridPos::new(1, 0), blocker: GridPos::new(3, 1) }
        );
        assert_eq!(motion.anchor(), GridPos::new(0, 0));
        assert_eq!(motion.move_checked(MoveDirection::Up, &registry), Ok(GridPos::new(0, 1)));
    }

    #[test]
    fn test_robot_footprint_clipped() {
        let grid = Grid::new(20);
        assert_eq!(robot_footprint(&grid, GridPos::new(0, 0)).len(), 9);
        assert_eq!(robot_footprint(&grid, GridPos::new(19, 19)).len(), 1);
        assert!(robot_covers(GridPos::new(2, 2), GridPos::new(4, 4)));
        assert!(!robot_covers(GridPos::new(2, 2), GridPos::new(5, 4)));
    }
}
