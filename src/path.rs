use crate::grid::GridPos;
use log::{debug, info};
use thiserror::Error;

/// Stepping past either end of the path. Not a failure, the index is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("already at the end of the path")]
pub struct NavigationNoOp;

/// A path must hold at least the start anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot load an empty path")]
pub struct EmptyPath;

/// Where playback currently sits on the loaded path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// No path loaded
    Idle,
    /// Path loaded, index at the start
    Ready,
    /// Strictly between the two ends
    Stepping,
    /// Index at `max_step_index` (only for paths longer than one position)
    AtEnd,
}

/// Snapshot of playback progress for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub current_step_index: usize,
    pub max_step_index: usize,
    pub started: bool,
}

/// Owns the planner's path and the playback index into it
#[derive(Debug, Clone, Default)]
pub struct PathController {
    path: Vec<GridPos>,
    index: usize,
}

impl PathController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the loaded path and rewind to its first position
    pub fn load_path(&mut self, path: Vec<GridPos>) -> Result<(), EmptyPath> {
        if path.is_empty() {
            return Err(EmptyPath);
        }
        info!("loaded path with {} positions", path.len());
        self.path = path;
        self.index = 0;
        Ok(())
    }

    /// Drop the path and return to `Idle`
    pub fn clear(&mut self) {
        self.path.clear();
        self.index = 0;
    }

    pub fn is_loaded(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn state(&self) -> PathState {
        if self.path.is_empty() {
            PathState::Idle
        } else if self.index == 0 {
            PathState::Ready
        } else if self.index == self.max_step_index() {
            PathState::AtEnd
        } else {
            PathState::Stepping
        }
    }

    /// Advance one step; clamps at the last position
    pub fn step_forward(&mut self) -> Result<GridPos, NavigationNoOp> {
        if self.path.is_empty() || self.index >= self.max_step_index() {
            return Err(NavigationNoOp);
        }
        self.index += 1;
        let pos = self.path[self.index];
        debug!("step {} -> ({}, {})", self.index, pos.x, pos.y);
        Ok(pos)
    }

    /// Go back one step; floors at the first position
    pub fn step_backward(&mut self) -> Result<GridPos, NavigationNoOp> {
        if self.path.is_empty() || self.index == 0 {
            return Err(NavigationNoOp);
        }
        self.index -= 1;
        let pos = self.path[self.index];
        debug!("step {} <- ({}, {})", self.index, pos.x, pos.y);
        Ok(pos)
    }

    /// `path[index]`, or None while idle
    pub fn current_position(&self) -> Option<GridPos> {
        self.path.get(self.index).copied()
    }

    pub fn current_step_index(&self) -> usize {
        self.index
    }

    pub fn max_step_index(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// `index / max_step_index`, defined as 0 for single-position paths
    pub fn progress_fraction(&self) -> f64 {
        let max = self.max_step_index();
        if max == 0 {
            return 0.0;
        }
        self.index as f64 / max as f64
    }

    /// Progress as shown next to the step controls, e.g. "3 / 12"
    pub fn step_label(&self) -> String {
        format!("{} / {}", self.index, self.max_step_index())
    }

    pub fn path(&self) -> &[GridPos] {
        &self.path
    }

    pub fn can_step_forward(&self) -> bool {
        self.is_loaded() && self.index < self.max_step_index()
    }

    pub fn can_step_backward(&self) -> bool {
        self.is_loaded() && self.index > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path(len: i32) -> Vec<GridPos> {
        (0..len).map(|y| GridPos::new(0, y)).collect()
    }

    #[test]
    fn test_idle_controller() {
        let mut controller = PathController::new();
        assert_eq!(controller.state(), PathState::Idle);
        assert_eq!(controller.current_position(), None);
        assert_eq!(controller.step_forward(), Err(NavigationNoOp));
        assert_eq!(controller.step_backward(), Err(NavigationNoOp));
        assert_eq!(controller.progress_fraction(), 0.0);
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut controller = PathController::new();
        assert_eq!(controller.load_path(Vec::new()), Err(EmptyPath));
        assert_eq!(controller.state(), PathState::Idle);
    }

    #[test]
    fn test_forward_clamps_at_end() {
        let mut controller = PathController::new();
        controller.load_path(straight_path(3)).unwrap();
        assert_eq!(controller.state(), PathState::Ready);

        assert_eq!(controller.step_forward(), Ok(GridPos::new(0, 1)));
        assert_eq!(controller.state(), PathState::Stepping);
        assert_eq!(controller.step_forward(), Ok(GridPos::new(0, 2)));
        assert_eq!(controller.state(), PathState::AtEnd);
        assert_eq!(controller.step_forward(), Err(NavigationNoOp));
        assert_eq!(controller.current_step_index(), 2);
        assert_eq!(controller.progress_fraction(), 1.0);
    }

    #[test]
    fn test_backward_floors_at_start() {
        let mut controller = PathController::new();
        controller.load_path(straight_path(2)).unwrap();
        assert_eq!(controller.step_backward(), Err(NavigationNoOp));
        controller.step_forward().unwrap();
        assert_eq!(controller.step_backward(), Ok(GridPos::new(0, 0)));
        assert_eq!(controller.current_step_index(), 0);
    }

    #[test]
    fn test_single_position_path() {
        let mut controller = PathController::new();
        controller.load_path(straight_path(1)).unwrap();
        assert_eq!(controller.state(), PathState::Ready);
        assert_eq!(controller.max_step_index(), 0);
        assert_eq!(controller.progress_fraction(), 0.0);
        assert_eq!(controller.step_forward(), Err(NavigationNoOp));
        assert_eq!(controller.step_label(), "0 / 0");
    }

    #[test]
    fn test_reload_rewinds() {
        let mut controller = PathController::new();
        controller.load_path(straight_path(5)).unwrap();
        controller.step_forward().unwrap();
        controller.step_forward().unwrap();

        controller.load_path(vec![GridPos::new(3, 3), GridPos::new(4, 3)]).unwrap();
        assert_eq!(controller.current_step_index(), 0);
        assert_eq!(controller.current_position(), Some(GridPos::new(3, 3)));
        assert_eq!(controller.max_step_index(), 1);
    }
}
