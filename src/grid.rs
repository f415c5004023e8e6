/// Default side length of the square arena
pub const GRID_SIZE: i32 = 20;

/// A cell in grid coordinates: origin at the bottom-left, y increasing upward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        GridPos { x, y }
    }

    /// Position shifted by (dx, dy)
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        GridPos::new(self.x + dx, self.y + dy)
    }
}

/// A cell in display indices: row 0 is the top row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayIndex {
    pub row: i32,
    pub col: i32,
}

impl DisplayIndex {
    pub fn new(row: i32, col: i32) -> Self {
        DisplayIndex { row, col }
    }
}

/// Square N x N arena and the transforms between its two addressing schemes.
///
/// Only grid coordinates are ever stored; display indices are derived when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub size: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(GRID_SIZE)
    }
}

impl Grid {
    pub fn new(size: i32) -> Self {
        Grid { size }
    }

    /// Check if (x, y) lies inside the arena
    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.size && y >= 0 && y < self.size
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.is_in_bounds(pos.x, pos.y)
    }

    /// Grid coordinate -> display index (`i = N - 1 - y`, `j = x`)
    pub fn to_display(&self, pos: GridPos) -> DisplayIndex {
        DisplayIndex::new(self.size - 1 - pos.y, pos.x)
    }

    /// Display index -> grid coordinate
    pub fn to_grid(&self, index: DisplayIndex) -> GridPos {
        GridPos::new(index.col, self.size - 1 - index.row)
    }

    /// Largest valid coordinate on either axis
    pub fn max_coord(&self) -> i32 {
        self.size - 1
    }

    /// Check that a 3x3 footprint centered on `center` stays inside the arena
    pub fn footprint_fits(&self, center: GridPos) -> bool {
        center.x >= 1 && center.x <= self.size - 2 && center.y >= 1 && center.y <= self.size - 2
    }

    /// Cells of the 3x3 block centered on `center`, clipped to the arena.
    /// The center comes first, neighbours follow in row-major order.
    pub fn footprint_cells(&self, center: GridPos) -> Vec<GridPos> {
        let mut cells = Vec::with_capacity(9);
        if self.contains(center) {
            cells.push(center);
        }
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let cell = center.offset(dx, dy);
                if self.contains(cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Iterate every cell in display order (top row first)
    pub fn display_cells(&self) -> impl Iterator<Item = DisplayIndex> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| DisplayIndex::new(row, col)))
    }
}
