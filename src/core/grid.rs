//! Cell and Pixel Geometry
//!
//! The simulation works on a text-style cell grid. Sprites that live in
//! pixel space (player, projectiles, bombs) are mapped onto cells through
//! [`PixelGeometry`].
//!
//! ```text
//!   pixel x ──► left_edge ─┬─ col 0 ─┬─ col 1 ─┬─ ...
//!                          │ cell_px │ cell_px │
//!   pixel y ──► top_edge ──┴─ row 0 ─┴─────────┴─ ...
//! ```

use std::fmt;
use std::ops::Add;
use serde::{Serialize, Deserialize};

/// Absolute or relative position on the cell grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column (x)
    pub col: i32,
    /// Row (y), growing downwards
    pub row: i32,
}

impl Cell {
    /// Origin cell (0, 0)
    pub const ZERO: Self = Self { col: 0, row: 0 };

    /// Create a new cell.
    #[inline]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Offset by a column and row delta.
    #[inline]
    pub const fn offset(self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }
}

impl Add for Cell {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.offset(other.col, other.row)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({}, {})", self.col, self.row)
    }
}

/// Axis-aligned block of cells (inclusive top-left, exclusive extent).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRect {
    /// Top-left cell
    pub origin: Cell,
    /// Width in columns
    pub width: i32,
    /// Height in rows
    pub height: i32,
}

impl CellRect {
    /// Create a rectangle from its top-left cell and extent.
    #[inline]
    pub const fn new(origin: Cell, width: i32, height: i32) -> Self {
        Self { origin, width, height }
    }

    /// Last column covered (inclusive).
    #[inline]
    pub fn right(&self) -> i32 {
        self.origin.col + self.width - 1
    }

    /// Last row covered (inclusive).
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.origin.row + self.height - 1
    }

    /// Check if a cell lies inside the rectangle.
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.col >= self.origin.col
            && cell.col <= self.right()
            && cell.row >= self.origin.row
            && cell.row <= self.bottom()
    }

    /// Check if the column ranges of two rectangles overlap.
    #[inline]
    pub fn overlaps_columns(&self, first_col: i32, last_col: i32) -> bool {
        self.origin.col <= last_col && self.right() >= first_col
    }

    /// Iterate covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |dr| {
            (0..self.width).map(move |dc| self.origin.offset(dc, dr))
        })
    }
}

/// A point in sprite pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal pixel
    pub x: i32,
    /// Vertical pixel
    pub y: i32,
}

impl PixelPoint {
    /// Create a new pixel point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Mapping between sprite pixels and grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelGeometry {
    /// Pixel x of column 0
    pub left_edge: i32,
    /// Pixel y of row 0
    pub top_edge: i32,
    /// Cell size in pixels (square cells)
    pub cell_px: i32,
}

impl Default for PixelGeometry {
    fn default() -> Self {
        Self {
            left_edge: 24,
            top_edge: 50,
            cell_px: 8,
        }
    }
}

impl PixelGeometry {
    /// Convert a pixel to the cell containing it.
    ///
    /// Returns `None` above or left of the grid.
    pub fn cell_of(&self, point: PixelPoint) -> Option<Cell> {
        if point.x < self.left_edge || point.y < self.top_edge || self.cell_px <= 0 {
            return None;
        }
        Some(Cell::new(
            (point.x - self.left_edge) / self.cell_px,
            (point.y - self.top_edge) / self.cell_px,
        ))
    }

    /// Pixel of a cell's top-left corner.
    #[inline]
    pub fn pixel_of(&self, cell: Cell) -> PixelPoint {
        PixelPoint::new(
            self.left_edge + cell.col * self.cell_px,
            self.top_edge + cell.row * self.cell_px,
        )
    }

    /// Columns covered by a sprite `width_px` wide starting at pixel `x`.
    ///
    /// `x` is clamped to the left edge first so a sprite hugging the border
    /// still maps to column 0.
    pub fn column_span(&self, x: i32, width_px: i32) -> (i32, i32) {
        let x = x.max(self.left_edge) - self.left_edge;
        let cell = self.cell_px.max(1);
        (x / cell, (x + width_px.max(1) - 1) / cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_add() {
        assert_eq!(Cell::new(2, 2) + Cell::new(3, 4), Cell::new(5, 6));
        assert_eq!(Cell::new(2, 2).offset(-1, 1), Cell::new(1, 3));
    }

    #[test]
    fn test_rect_contains() {
        let rect = CellRect::new(Cell::new(5, 5), 2, 2);
        assert!(rect.contains(Cell::new(5, 5)));
        assert!(rect.contains(Cell::new(6, 6)));
        assert!(!rect.contains(Cell::new(7, 5)));
        assert!(!rect.contains(Cell::new(5, 4)));
    }

    #[test]
    fn test_rect_cells_row_major() {
        let rect = CellRect::new(Cell::new(1, 1), 2, 2);
        let cells: Vec<Cell> = rect.cells().collect();
        assert_eq!(
            cells,
            vec![Cell::new(1, 1), Cell::new(2, 1), Cell::new(1, 2), Cell::new(2, 2)]
        );
    }

    #[test]
    fn test_column_overlap() {
        let rect = CellRect::new(Cell::new(10, 22), 2, 2);
        assert!(rect.overlaps_columns(11, 13));
        assert!(rect.overlaps_columns(7, 10));
        assert!(!rect.overlaps_columns(12, 14));
        assert!(!rect.overlaps_columns(6, 9));
    }

    #[test]
    fn test_pixel_mapping() {
        let geo = PixelGeometry::default();
        assert_eq!(geo.cell_of(PixelPoint::new(24, 50)), Some(Cell::new(0, 0)));
        assert_eq!(geo.cell_of(PixelPoint::new(39, 65)), Some(Cell::new(1, 1)));
        assert_eq!(geo.cell_of(PixelPoint::new(23, 60)), None);
        assert_eq!(geo.cell_of(PixelPoint::new(30, 49)), None);
        assert_eq!(geo.pixel_of(Cell::new(1, 1)), PixelPoint::new(32, 58));
    }

    #[test]
    fn test_column_span_clamps_left() {
        let geo = PixelGeometry::default();
        // 24px sprite at the left border covers columns 0..=2
        assert_eq!(geo.column_span(0, 24), (0, 2));
        assert_eq!(geo.column_span(24, 24), (0, 2));
        assert_eq!(geo.column_span(172, 24), (18, 21));
    }
}
