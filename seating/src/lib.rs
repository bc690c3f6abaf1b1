//! Theater seat allocation.
//!
//! Seats a stream of reservation requests on a fixed grid, keeping a safety
//! buffer of empty seats around every seated group, and reports which requests
//! were seated together, seated split, or turned away.
//!
//! # Architecture
//!
//! ```text
//! request lines ──parse──▶ SeatingAction (command)
//!                               │
//!                               ▼
//!                     ┌───────────────────┐
//!                     │  SeatingReducer   │  validate ▶ place ▶ buffer
//!                     │  (SeatingState)   │
//!                     └───────────────────┘
//!                               │
//!                      Effect::Publish(event)
//!                               │
//!                               ▼
//!                 observers (allocation records)
//! ```
//!
//! # Placement
//!
//! A request is cut into groups no wider than a row. Each group takes the
//! leftmost contiguous run in the first row that has one, scanning from the
//! last row up. Groups that find no run are scattered over free cells in the
//! same row order. The buffer around a group is laid down before the next
//! group is placed.
//!
//! # Example
//!
//! ```
//! use seatplan::{seating_store, process_lines, TheaterLayout};
//!
//! let mut store = seating_store(TheaterLayout::default());
//! process_lines(&mut store, ["R001 5", "R002 500", "R003 0"]).unwrap();
//!
//! let report = store.state(|s| s.report());
//! assert_eq!(report.manifest, vec!["R001 j1 j2 j3 j4 j5"]);
//! assert_eq!(report.rejected_line(), "R002 R003");
//! ```

pub mod aggregate;
pub mod buffer;
pub mod config;
pub mod grid;
pub mod ledger;
pub mod placement;
pub mod report;
pub mod request;
pub mod types;

pub use aggregate::{SeatingAction, SeatingEnvironment, SeatingReducer, SeatingState};
pub use config::{Config, ConfigError};
pub use placement::{BottomUp, ScanPolicy, TopDown};
pub use report::SeatingReport;
pub use request::{parse_line, ReservationRequest, RequestError};
pub use types::{
    OutcomeCounters, RejectionReason, ReservationId, SeatLabel, SeatingMode, Span, TheaterLayout,
};

use seatplan_runtime::{Store, StoreError};

/// Store running the seating reducer
pub type SeatingStore = Store<SeatingState, SeatingAction, SeatingEnvironment, SeatingReducer>;

/// Creates a store over an empty grid with the production scan policy
#[must_use]
pub fn seating_store(layout: TheaterLayout) -> SeatingStore {
    Store::new(
        SeatingState::new(layout),
        SeatingReducer::new(),
        SeatingEnvironment::default(),
    )
}

/// Sends every request line through the store, in order
///
/// Blank lines are skipped. Returns the number of requests sent.
///
/// # Errors
///
/// Returns [`StoreError`] if the store refuses an action.
pub fn process_lines<I, L>(store: &mut SeatingStore, lines: I) -> Result<usize, StoreError>
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    let mut sent = 0;
    for line in lines {
        if let Some(action) = parse_line(line.as_ref()) {
            store.send(action)?;
            sent += 1;
        }
    }
    Ok(sent)
}
