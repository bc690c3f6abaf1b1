//! Safety buffers around seated spans.

use crate::grid::SeatGrid;
use crate::types::Span;

/// Buffer widths applied around every seated span
///
/// Row buffers cover the span's own columns in the rows above and below it.
/// Column buffers extend the span left and right within its own row. Corners
/// are not covered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferZone {
    /// Rows above and below
    pub row_buffer: usize,
    /// Columns left and right
    pub col_buffer: usize,
}

impl BufferZone {
    /// Creates a new `BufferZone`
    #[must_use]
    pub const fn new(row_buffer: usize, col_buffer: usize) -> Self {
        Self {
            row_buffer,
            col_buffer,
        }
    }

    /// Marks the buffer cells around `span` unavailable
    ///
    /// Cells outside the grid are skipped. Returns the number of cells that
    /// were available before this call.
    pub fn apply(&self, grid: &mut SeatGrid, span: &Span) -> usize {
        let mut marked = 0;

        for distance in 1..=self.row_buffer {
            for col in span.columns() {
                if let Some(above) = span.row.checked_sub(distance) {
                    marked += usize::from(grid.occupy(above, col));
                }
                marked += usize::from(grid.occupy(span.row + distance, col));
            }
        }

        for distance in 1..=self.col_buffer {
            if let Some(left) = span.start.checked_sub(distance) {
                marked += usize::from(grid.occupy(span.row, left));
            }
            marked += usize::from(grid.occupy(span.row, span.end + distance - 1));
        }

        tracing::trace!(?span, marked, "buffer applied");
        marked
    }
}
