//! Seat occupancy grid.
//!
//! A cell is either available or unavailable; seated and buffered cells are
//! both unavailable and are not told apart. Occupancy only ever moves from
//! available to unavailable.

use crate::types::Span;

/// Occupancy matrix with per-row and total availability counters
///
/// Invariants:
/// - `row_remaining(r)` equals the number of available cells in row `r`
/// - `capacity()` equals the sum of all `row_remaining` values
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
    row_remaining: Vec<usize>,
    capacity: usize,
}

impl SeatGrid {
    /// Creates a grid with every cell available
    ///
    /// A shape whose cell count overflows `usize` yields an empty grid that
    /// seats nothing; `Config::validate` rejects such shapes up front.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        let Some(cells) = rows.checked_mul(cols) else {
            tracing::error!(rows, cols, "grid shape overflows; using an empty grid");
            return Self::new(0, 0);
        };
        Self {
            rows,
            cols,
            cells: vec![false; cells],
            row_remaining: vec![cols; rows],
            capacity: cells,
        }
    }

    /// Number of rows
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Cells still available across the whole grid
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cells in the grid regardless of occupancy
    #[must_use]
    pub const fn nominal_capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// Available cells left in `row`; zero for rows outside the grid
    #[must_use]
    pub fn row_remaining(&self, row: usize) -> usize {
        self.row_remaining.get(row).copied().unwrap_or(0)
    }

    /// Returns `true` when `row` has no available cells
    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row_remaining(row) == 0
    }

    const fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    /// Returns `true` if the cell is unavailable
    ///
    /// Cells outside the grid count as unavailable.
    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.index(row, col).is_none_or(|i| self.cells[i])
    }

    /// Marks a cell unavailable
    ///
    /// Returns `true` only when the cell flips from available to unavailable;
    /// the counters move only then. Cells outside the grid are ignored.
    pub fn occupy(&mut self, row: usize, col: usize) -> bool {
        let Some(i) = self.index(row, col) else {
            return false;
        };
        if self.cells[i] {
            return false;
        }
        self.cells[i] = true;
        self.row_remaining[row] -= 1;
        self.capacity -= 1;
        true
    }

    /// Marks every cell of `span` unavailable, returning how many flipped
    pub fn occupy_span(&mut self, span: &Span) -> usize {
        span.columns()
            .filter(|&col| self.occupy(span.row, col))
            .count()
    }

    /// Start column of the leftmost run of `len` available cells in `row`
    ///
    /// Scans left to right, restarting the count at every unavailable cell.
    #[must_use]
    pub fn leftmost_run(&self, row: usize, len: usize) -> Option<usize> {
        if len == 0 || row >= self.rows {
            return None;
        }

        let mut run = 0;
        for col in 0..self.cols {
            if self.is_occupied(row, col) {
                run = 0;
                continue;
            }
            run += 1;
            if run == len {
                return Some(col + 1 - len);
            }
        }
        None
    }

    /// Occupancy of one row, left to right
    #[must_use]
    pub fn row(&self, row: usize) -> &[bool] {
        self.index(row, 0)
            .map_or(&[][..], |start| &self.cells[start..start + self.cols])
    }

    /// Text rendering, one line per row: `X` unavailable, `_` available
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for row in 0..self.rows {
            out.extend(
                self.row(row)
                    .iter()
                    .map(|&taken| if taken { 'X' } else { '_' }),
            );
            out.push('\n');
        }
        out
    }
}
