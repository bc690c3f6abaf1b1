//! Domain types for theater seat allocation.
//!
//! Value objects shared by the grid, the placement engine, the ledger and the
//! seating reducer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque reservation identifier taken from the first token of a request line
///
/// Ordered so the ticket ledger lists reservations in sorted id order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    /// Creates a new `ReservationId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReservationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Seat Labels
// ============================================================================

const ROW_ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Printed seat label: row letters followed by the 1-based column number
///
/// Row 0 is `a`, row 25 is `z`; taller grids continue with `aa`, `ab`, ...
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatLabel(String);

impl SeatLabel {
    /// Encodes a zero-based `(row, col)` position as a seat label
    #[must_use]
    pub fn encode(row: usize, col: usize) -> Self {
        let mut label = row_letters(row);
        label.push_str(&(col + 1).to_string());
        Self(label)
    }

    /// Returns the label as a string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bijective base-26 row letters
fn row_letters(row: usize) -> String {
    let mut letters = Vec::new();
    let mut n = row + 1;
    while n > 0 {
        n -= 1;
        letters.push(char::from(ROW_ALPHABET[n % 26]));
        n /= 26;
    }
    letters.iter().rev().collect()
}

// ============================================================================
// Placement Shapes
// ============================================================================

/// A contiguous run of cells in one row, `start` inclusive and `end` exclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Zero-based row index
    pub row: usize,
    /// First column of the run
    pub start: usize,
    /// One past the last column of the run
    pub end: usize,
}

impl Span {
    /// Creates a new `Span`
    #[must_use]
    pub const fn new(row: usize, start: usize, end: usize) -> Self {
        Self { row, start, end }
    }

    /// Number of cells covered
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no cells
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Columns covered by the span
    #[must_use]
    pub const fn columns(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Seat labels for the span, left to right
    pub fn labels(&self) -> impl Iterator<Item = SeatLabel> + '_ {
        self.columns().map(|col| SeatLabel::encode(self.row, col))
    }
}

/// How a reservation ended up seated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatingMode {
    /// Every group of the reservation found a contiguous run
    Together,
    /// At least one group was scattered across free cells
    Split,
}

impl fmt::Display for SeatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Together => f.write_str("together"),
            Self::Split => f.write_str("split"),
        }
    }
}

/// Why a request was turned away before placement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Seat count was zero or negative
    InvalidCount,
    /// Seat count was larger than the whole grid
    ExceedsCapacity,
    /// The request line had no readable seat count
    Malformed,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCount => f.write_str("invalid seat count"),
            Self::ExceedsCapacity => f.write_str("exceeds capacity"),
            Self::Malformed => f.write_str("malformed request"),
        }
    }
}

// ============================================================================
// Layout and Counters
// ============================================================================

/// Fixed theater shape and buffer widths for one run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheaterLayout {
    /// Number of rows
    pub rows: usize,
    /// Seats per row
    pub cols: usize,
    /// Rows kept free above and below every seated span
    pub row_buffer: usize,
    /// Seats kept free left and right of every seated span
    pub col_buffer: usize,
}

impl TheaterLayout {
    /// Creates a new `TheaterLayout`
    #[must_use]
    pub const fn new(rows: usize, cols: usize, row_buffer: usize, col_buffer: usize) -> Self {
        Self {
            rows,
            cols,
            row_buffer,
            col_buffer,
        }
    }

    /// Total number of cells, ignoring buffers and occupancy
    ///
    /// This is the admission ceiling for a single request.
    #[must_use]
    pub const fn nominal_capacity(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }
}

impl Default for TheaterLayout {
    /// The reference venue: 10 rows of 20 seats, one buffer row, three buffer seats
    fn default() -> Self {
        Self::new(10, 20, 1, 3)
    }
}

/// Outcome tallies, one increment per request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounters {
    /// Seated with every group contiguous
    pub together: usize,
    /// Seated with at least one scattered group
    pub split: usize,
    /// Rejected for asking for more seats than the grid has
    pub exceeds_capacity: usize,
    /// Rejected for a non-positive or unreadable seat count
    pub invalid: usize,
    /// Admitted but the grid ran out of free cells part way through
    pub incomplete: usize,
}

impl OutcomeCounters {
    /// Record a seated reservation
    pub const fn record_seated(&mut self, mode: SeatingMode) {
        match mode {
            SeatingMode::Together => self.together += 1,
            SeatingMode::Split => self.split += 1,
        }
    }

    /// Record a rejected request
    pub const fn record_rejected(&mut self, reason: RejectionReason) {
        match reason {
            RejectionReason::ExceedsCapacity => self.exceeds_capacity += 1,
            RejectionReason::InvalidCount | RejectionReason::Malformed => self.invalid += 1,
        }
    }

    /// Record an admitted request that could not be fully seated
    pub const fn record_incomplete(&mut self) {
        self.incomplete += 1;
    }

    /// Total requests seen
    #[must_use]
    pub const fn total(&self) -> usize {
        self.together + self.split + self.exceeds_capacity + self.invalid + self.incomplete
    }
}
