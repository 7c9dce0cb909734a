//! Cell Grid - contents of one display surface
//!
//! A 2D array of cells in row-major order. Backends keep one grid per
//! surface they hand out; region reads and writes are how the refresh
//! protocol copies a published frame forward onto the next back surface.

use super::cell::{Cell, DeviceAttr};

/// Dimensions in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}

impl Size {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells
    pub const fn area(self) -> usize {
        self.rows * self.cols
    }
}

/// A rectangular region of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub top: usize,
    pub left: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Rect {
    pub const fn new(top: usize, left: usize, rows: usize, cols: usize) -> Self {
        Self { top, left, rows, cols }
    }

    /// The rectangle covering a whole surface of `size`
    pub const fn full(size: Size) -> Self {
        Self::new(0, 0, size.rows, size.cols)
    }

    pub const fn area(&self) -> usize {
        self.rows * self.cols
    }
}

/// The cell grid of one surface
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    /// Grid height in rows
    pub rows: usize,
    /// Grid width in columns
    pub cols: usize,
    /// The cell buffer (row-major order)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a blank grid
    pub fn new(size: Size) -> Self {
        let cells = vec![Cell::default(); size.area()];
        Self {
            rows: size.rows,
            cols: size.cols,
            cells,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.rows, self.cols)
    }

    /// Get the index for a position
    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    /// Get a reference to a cell
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    /// Get a mutable reference to a cell
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.index(row, col).map(|i| &mut self.cells[i])
    }

    /// Character at a position, if in range
    pub fn char_at(&self, row: usize, col: usize) -> Option<char> {
        self.get(row, col).map(|c| c.ch)
    }

    /// Set a cell. Returns false if the position is out of range.
    pub fn set(&mut self, row: usize, col: usize, ch: char, attrs: DeviceAttr) -> bool {
        match self.get_mut(row, col) {
            Some(cell) => {
                *cell = Cell::with_attrs(ch, attrs);
                true
            }
            None => false,
        }
    }

    /// Clear the entire grid to blanks
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Whether `rect` lies entirely inside the grid
    pub fn contains_rect(&self, rect: Rect) -> bool {
        rect.top + rect.rows <= self.rows && rect.left + rect.cols <= self.cols
    }

    /// Copy a region out, row by row
    pub fn read_region(&self, rect: Rect) -> Option<Vec<Cell>> {
        if !self.contains_rect(rect) {
            return None;
        }
        let mut out = Vec::with_capacity(rect.area());
        for row in rect.top..rect.top + rect.rows {
            let start = row * self.cols + rect.left;
            out.extend_from_slice(&self.cells[start..start + rect.cols]);
        }
        Some(out)
    }

    /// Write a region laid out as [`read_region`](Self::read_region) returns it.
    /// Returns false without writing if the region or cell count does not fit.
    pub fn write_region(&mut self, rect: Rect, cells: &[Cell]) -> bool {
        if !self.contains_rect(rect) || cells.len() != rect.area() {
            return false;
        }
        for (i, chunk) in cells.chunks(rect.cols.max(1)).enumerate().take(rect.rows) {
            let start = (rect.top + i) * self.cols + rect.left;
            self.cells[start..start + chunk.len()].copy_from_slice(chunk);
        }
        true
    }

    /// Get iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let row = i / self.cols;
            let col = i % self.cols;
            (row, col, cell)
        })
    }

    /// Cells that differ from `previous` at the same position.
    /// Positions outside `previous` always count as changed.
    pub fn iter_changed<'a>(
        &'a self,
        previous: &'a Grid,
    ) -> impl Iterator<Item = (usize, usize, &'a Cell)> + 'a {
        self.iter()
            .filter(move |(row, col, cell)| previous.get(*row, *col) != Some(*cell))
    }

    /// One row as text, for tests and headless dumps
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = row * self.cols;
        self.cells[start..start + self.cols].iter().map(|c| c.ch).collect()
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grid({}x{})", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_new() {
        let grid = Grid::new(Size::new(24, 80));
        assert_eq!(grid.rows, 24);
        assert_eq!(grid.cols, 80);
        assert_eq!(grid.char_at(23, 79), Some(' '));
        assert_eq!(grid.char_at(24, 0), None);
    }

    #[test]
    fn test_grid_set_get() {
        let mut grid = Grid::new(Size::new(24, 80));
        assert!(grid.set(5, 10, 'X', DeviceAttr::FG_RED));

        let cell = grid.get(5, 10).unwrap();
        assert_eq!(cell.ch, 'X');
        assert_eq!(cell.attrs, DeviceAttr::FG_RED);
        assert!(!grid.set(24, 0, 'Y', DeviceAttr::DEFAULT));
    }

    #[test]
    fn test_region_copy() {
        let mut src = Grid::new(Size::new(4, 6));
        src.set(1, 2, 'a', DeviceAttr::DEFAULT);
        src.set(2, 3, 'b', DeviceAttr::FG_GREEN);

        let rect = Rect::new(1, 2, 2, 3);
        let cells = src.read_region(rect).unwrap();
        assert_eq!(cells.len(), 6);

        let mut dst = Grid::new(Size::new(4, 6));
        assert!(dst.write_region(rect, &cells));
        assert_eq!(dst.char_at(1, 2), Some('a'));
        assert_eq!(dst.get(2, 3).unwrap().attrs, DeviceAttr::FG_GREEN);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_region_rejects_out_of_range() {
        let grid = Grid::new(Size::new(4, 6));
        assert!(grid.read_region(Rect::new(3, 0, 2, 6)).is_none());

        let mut grid = Grid::new(Size::new(4, 6));
        assert!(!grid.write_region(Rect::new(0, 0, 1, 2), &[Cell::new('x')]));
    }

    #[test]
    fn test_iter_changed() {
        let before = Grid::new(Size::new(2, 3));
        let mut after = before.clone();
        after.set(1, 1, 'z', DeviceAttr::DEFAULT);
        let changed: Vec<_> = after.iter_changed(&before).map(|(r, c, _)| (r, c)).collect();
        assert_eq!(changed, vec![(1, 1)]);
        assert_eq!(after.row_text(1), " z ");
    }
}
