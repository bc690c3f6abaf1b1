//! Placement engine: decides where a reservation's seats go.
//!
//! A reservation is cut into groups of at most one row's width. Each group is
//! first offered a contiguous run (first row in scan order, leftmost run in
//! that row). If no row has one, the group is scattered over whatever cells
//! are free, row by row in scan order and left to right within a row. Buffers
//! for a group are applied once all of its spans are known and before the
//! next group is placed.

use crate::buffer::BufferZone;
use crate::grid::SeatGrid;
use crate::ledger::TicketLedger;
use crate::types::{ReservationId, SeatLabel, SeatingMode, Span};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Scan Policy
// ============================================================================

/// Row visiting order for both the contiguous search and the scatter fallback
///
/// The order is part of the output contract: the same requests under the
/// same policy always produce the same seating.
pub trait ScanPolicy: fmt::Debug {
    /// Row indices of a grid with `rows` rows, in visiting order
    fn row_order(&self, rows: usize) -> Box<dyn Iterator<Item = usize>>;
}

/// Last row first; the production policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BottomUp;

impl ScanPolicy for BottomUp {
    fn row_order(&self, rows: usize) -> Box<dyn Iterator<Item = usize>> {
        Box::new((0..rows).rev())
    }
}

/// First row first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TopDown;

impl ScanPolicy for TopDown {
    fn row_order(&self, rows: usize) -> Box<dyn Iterator<Item = usize>> {
        Box::new(0..rows)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Where one reservation was seated
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Labels in assignment order
    pub seats: Vec<SeatLabel>,
    /// Seated spans in assignment order
    pub spans: Vec<Span>,
    /// `Split` if any group fell back to scattering
    pub mode: SeatingMode,
}

/// Placement failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// The grid ran out of available cells before the reservation was seated
    ///
    /// Seats placed before this point stay placed and stay in the ledger.
    #[error("grid exhausted after seating {placed} of {requested} seats")]
    GridExhausted {
        /// Seats asked for
        requested: usize,
        /// Seats actually placed
        placed: usize,
    },
}

// ============================================================================
// Engine
// ============================================================================

/// Seats reservations on a grid, issuing tickets to a ledger
#[derive(Debug)]
pub struct PlacementEngine<'a> {
    grid: &'a mut SeatGrid,
    ledger: &'a mut TicketLedger,
    buffer: BufferZone,
    policy: &'a dyn ScanPolicy,
}

impl<'a> PlacementEngine<'a> {
    /// Creates an engine over the given grid and ledger
    pub fn new(
        grid: &'a mut SeatGrid,
        ledger: &'a mut TicketLedger,
        buffer: BufferZone,
        policy: &'a dyn ScanPolicy,
    ) -> Self {
        Self {
            grid,
            ledger,
            buffer,
            policy,
        }
    }

    /// Seats `seats` seats for `reservation_id`
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::GridExhausted`] if the grid runs out of
    /// available cells. Groups placed before that point are kept.
    pub fn place(
        &mut self,
        reservation_id: &ReservationId,
        seats: usize,
    ) -> Result<Placement, PlacementError> {
        let mut placement = Placement {
            seats: Vec::with_capacity(seats),
            spans: Vec::new(),
            mode: SeatingMode::Together,
        };
        let mut remaining = seats;

        while remaining > 0 {
            let group = remaining.min(self.grid.cols());

            let spans = if let Some(span) = self.seat_together(group) {
                tracing::debug!(%reservation_id, group, ?span, "group seated together");
                smallvec![span]
            } else {
                placement.mode = SeatingMode::Split;
                let spans = self.seat_scattered(group);
                tracing::debug!(%reservation_id, group, spans = spans.len(), "group split");
                spans
            };

            let mut seated = 0;
            for span in &spans {
                seated += span.len();
                for label in span.labels() {
                    self.ledger.issue(reservation_id, label.clone());
                    placement.seats.push(label);
                }
            }
            for span in &spans {
                self.buffer.apply(self.grid, span);
            }
            placement.spans.extend(spans);
            remaining -= seated;

            // A zero-width grid seats nothing and must not loop
            if seated < group || seated == 0 {
                return Err(PlacementError::GridExhausted {
                    requested: seats,
                    placed: seats - remaining,
                });
            }
        }

        Ok(placement)
    }

    /// First row in scan order with a run of `group` free cells; occupies it
    fn seat_together(&mut self, group: usize) -> Option<Span> {
        let span = self
            .policy
            .row_order(self.grid.rows())
            .filter(|&row| self.grid.row_remaining(row) >= group)
            .find_map(|row| {
                self.grid
                    .leftmost_run(row, group)
                    .map(|start| Span::new(row, start, start + group))
            })?;
        self.grid.occupy_span(&span);
        Some(span)
    }

    /// Consumes free cells in scan order until `group` are seated or none remain
    fn seat_scattered(&mut self, group: usize) -> SmallVec<[Span; 4]> {
        let mut spans = SmallVec::new();
        let mut needed = group;
        let cols = self.grid.cols();

        for row in self.policy.row_order(self.grid.rows()) {
            if needed == 0 {
                break;
            }
            if self.grid.is_row_full(row) {
                continue;
            }

            let mut col = 0;
            while col < cols && needed > 0 {
                if self.grid.is_occupied(row, col) {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < cols && needed > 0 && self.grid.occupy(row, col) {
                    col += 1;
                    needed -= 1;
                }
                spans.push(Span::new(row, start, col));
            }
        }

        spans
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn labels(placement: &Placement) -> Vec<&str> {
        placement.seats.iter().map(SeatLabel::as_str).collect()
    }

    fn place(
        grid: &mut SeatGrid,
        ledger: &mut TicketLedger,
        buffer: BufferZone,
        id: &str,
        seats: usize,
    ) -> Result<Placement, PlacementError> {
        PlacementEngine::new(grid, ledger, buffer, &BottomUp).place(&ReservationId::from(id), seats)
    }

    #[test]
    fn first_request_takes_bottom_row_leftmost() {
        let mut grid = SeatGrid::new(10, 20);
        let mut ledger = TicketLedger::new();

        let placement = place(&mut grid, &mut ledger, BufferZone::new(1, 3), "R1", 5).unwrap();

        assert_eq!(placement.mode, SeatingMode::Together);
        assert_eq!(labels(&placement), vec!["j1", "j2", "j3", "j4", "j5"]);
        assert_eq!(placement.spans, vec![Span::new(9, 0, 5)]);

        // Seats plus three buffer seats to the right in row 9
        assert_eq!(&grid.row(9)[..9], &[true, true, true, true, true, true, true, true, false]);
        // Row buffer above covers only the span's columns
        assert_eq!(&grid.row(8)[..6], &[true, true, true, true, true, false]);
        assert_eq!(grid.capacity(), 200 - 5 - 3 - 5);
        assert_eq!(ledger.seats_for(&ReservationId::from("R1")).len(), 5);
    }

    #[test]
    fn contiguous_search_prefers_scan_order_over_fit() {
        let mut grid = SeatGrid::new(3, 5);
        let mut ledger = TicketLedger::new();
        // Bottom row has a run of 2 at columns 3..5 only
        grid.occupy_span(&Span::new(2, 0, 3));

        let placement = place(&mut grid, &mut ledger, BufferZone::default(), "R1", 2).unwrap();

        assert_eq!(labels(&placement), vec!["c4", "c5"]);
    }

    #[test]
    fn group_without_a_run_is_scattered_bottom_up() {
        let mut grid = SeatGrid::new(2, 4);
        let mut ledger = TicketLedger::new();
        let zone = BufferZone::new(1, 0);

        place(&mut grid, &mut ledger, zone, "R1", 2).unwrap();
        // b1 b2 seated, a1 a2 buffered
        let placement = place(&mut grid, &mut ledger, zone, "R2", 3).unwrap();

        assert_eq!(placement.mode, SeatingMode::Split);
        assert_eq!(labels(&placement), vec!["b3", "b4", "a3"]);
        assert_eq!(placement.spans, vec![Span::new(1, 2, 4), Span::new(0, 2, 3)]);
        assert_eq!(grid.capacity(), 0);
    }

    #[test]
    fn scattered_spans_can_be_single_cells() {
        let mut grid = SeatGrid::new(1, 5);
        let mut ledger = TicketLedger::new();
        grid.occupy(0, 1);
        grid.occupy(0, 3);

        let placement = place(&mut grid, &mut ledger, BufferZone::default(), "R1", 3).unwrap();

        assert_eq!(placement.mode, SeatingMode::Split);
        assert_eq!(
            placement.spans,
            vec![Span::new(0, 0, 1), Span::new(0, 2, 3), Span::new(0, 4, 5)]
        );
    }

    #[test]
    fn wide_requests_are_seated_in_row_sized_groups() {
        let mut grid = SeatGrid::new(10, 20);
        let mut ledger = TicketLedger::new();

        let placement = place(&mut grid, &mut ledger, BufferZone::new(1, 3), "R1", 40).unwrap();

        // Row 8 is buffered by the first group, so the second lands in row 7
        assert_eq!(placement.mode, SeatingMode::Together);
        assert_eq!(placement.spans, vec![Span::new(9, 0, 20), Span::new(7, 0, 20)]);
        assert_eq!(placement.seats.first().map(SeatLabel::as_str), Some("j1"));
        assert_eq!(placement.seats.last().map(SeatLabel::as_str), Some("h20"));
        assert!(grid.is_row_full(6));
    }

    #[test]
    fn buffers_of_one_group_apply_before_the_next_group() {
        // Without the interleaving the second group would fit row 0 right above the first
        let mut grid = SeatGrid::new(3, 2);
        let mut ledger = TicketLedger::new();

        let placement = place(&mut grid, &mut ledger, BufferZone::new(1, 0), "R1", 4).unwrap();

        assert_eq!(placement.spans, vec![Span::new(2, 0, 2), Span::new(0, 0, 2)]);
        assert_eq!(placement.mode, SeatingMode::Together);
    }

    #[test]
    fn one_split_group_makes_the_reservation_split() {
        let mut grid = SeatGrid::new(3, 4);
        let mut ledger = TicketLedger::new();
        for row in 0..2 {
            grid.occupy(row, 1);
            grid.occupy(row, 3);
        }

        let placement = place(&mut grid, &mut ledger, BufferZone::default(), "R1", 6).unwrap();

        // First group of 4 fills row 2 together, the remaining 2 have no run left
        assert_eq!(placement.spans[0], Span::new(2, 0, 4));
        assert_eq!(labels(&placement)[4..], ["b1", "b3"]);
        assert_eq!(placement.mode, SeatingMode::Split);
    }

    #[test]
    fn exhausted_grid_keeps_what_was_placed() {
        let mut grid = SeatGrid::new(2, 2);
        let mut ledger = TicketLedger::new();
        let zone = BufferZone::new(1, 1);

        place(&mut grid, &mut ledger, zone, "R1", 1).unwrap();
        let result = place(&mut grid, &mut ledger, zone, "R2", 3);

        assert_eq!(
            result,
            Err(PlacementError::GridExhausted {
                requested: 3,
                placed: 1
            })
        );
        let seats: Vec<&str> = ledger
            .seats_for(&ReservationId::from("R2"))
            .iter()
            .map(SeatLabel::as_str)
            .collect();
        assert_eq!(seats, vec!["a2"]);
        assert_eq!(grid.capacity(), 0);
    }

    #[test]
    fn scan_policy_controls_row_order() {
        let mut grid = SeatGrid::new(3, 3);
        let mut ledger = TicketLedger::new();

        let placement = PlacementEngine::new(&mut grid, &mut ledger, BufferZone::default(), &TopDown)
            .place(&ReservationId::from("R1"), 2)
            .unwrap();

        assert_eq!(labels(&placement), vec!["a1", "a2"]);
    }
}
