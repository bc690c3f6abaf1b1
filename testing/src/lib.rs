//! # Seatplan Testing
//!
//! Testing utilities and helpers for the seatplan reducer architecture.
//!
//! This crate provides:
//! - A fluent Given/When/Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effects
//! - Property-based testing strategies for seating request streams
//!
//! ## Example
//!
//! ```ignore
//! use seatplan_testing::ReducerTest;
//!
//! ReducerTest::new(SeatingReducer::new())
//!     .with_env(SeatingEnvironment::default())
//!     .given_state(SeatingState::new(layout))
//!     .when_action(SeatingAction::ReserveSeats { reservation_id, seats: 5 })
//!     .then_state(|state| assert_eq!(state.ledger().seat_count(), 5))
//!     .run();
//! ```


/// Property-based testing utilities
///
/// Strategies produce plain values (ids, counts, lines, grid shapes) so any
/// crate can use them without this crate depending on its domain types.
pub mod properties {
    use proptest::collection::vec;
    use proptest::prelude::*;

    /// Grid shape used by property tests: rows, columns, row buffer, column buffer
    pub type LayoutParts = (usize, usize, usize, usize);

    /// Reservation ids in the `R###` form used by request files
    pub fn arb_reservation_id() -> impl Strategy<Value = String> {
        (1_u32..1000).prop_map(|n| format!("R{n:03}"))
    }

    /// Seat counts around the interesting boundaries of a grid with the given capacity
    ///
    /// Mostly small valid counts, with non-positive and oversized counts mixed in.
    pub fn arb_seat_count(capacity: usize) -> impl Strategy<Value = i64> {
        let capacity = i64::try_from(capacity).unwrap_or(i64::MAX);
        prop_oneof![
            6 => 1_i64..=12,
            2 => 1_i64..=capacity.max(1),
            1 => -3_i64..=0,
            1 => capacity.saturating_add(1)..=capacity.saturating_add(50),
        ]
    }

    /// Small grid shapes, including zero buffers and single-row grids
    pub fn arb_layout() -> impl Strategy<Value = LayoutParts> {
        (1_usize..=8, 1_usize..=12, 0_usize..=2, 0_usize..=3)
    }

    /// A stream of `(id, count)` requests sized against the given capacity
    pub fn arb_requests(capacity: usize, max_len: usize) -> impl Strategy<Value = Vec<(String, i64)>> {
        vec((arb_reservation_id(), arb_seat_count(capacity)), 0..=max_len)
    }

    /// A grid shape together with a request stream that fits it
    pub fn arb_scenario(max_len: usize) -> impl Strategy<Value = (LayoutParts, Vec<(String, i64)>)> {
        arb_layout().prop_flat_map(move |layout| {
            let capacity = layout.0 * layout.1;
            (Just(layout), arb_requests(capacity, max_len))
        })
    }

    /// Render a request as an input line
    #[must_use]
    pub fn request_line(id: &str, seats: i64) -> String {
        format!("{id} {seats}")
    }
}

// Re-export commonly used items
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::properties::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn scenario_requests_are_well_formed((layout, requests) in arb_scenario(20)) {
            prop_assert!(layout.0 >= 1 && layout.1 >= 1);
            prop_assert!(requests.len() <= 20);
            for (id, _) in &requests {
                prop_assert!(id.starts_with('R'));
            }
        }

        #[test]
        fn request_line_round_trips_through_whitespace_split(id in arb_reservation_id(), seats in -5_i64..500) {
            let line = request_line(&id, seats);
            let mut parts = line.split_whitespace();
            prop_assert_eq!(parts.next(), Some(id.as_str()));
            prop_assert_eq!(parts.next().and_then(|s| s.parse::<i64>().ok()), Some(seats));
        }
    }
}
