//! End-of-run reporting.

use crate::aggregate::SeatingState;
use crate::types::{OutcomeCounters, ReservationId};
use std::fmt;

/// Read-only snapshot of a finished (or in-progress) run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatingReport {
    /// Grid rendering, `X` unavailable and `_` available, one line per row
    pub seating_map: String,
    /// Manifest lines in sorted reservation id order
    pub manifest: Vec<String>,
    /// Rejected request ids, in encounter order
    pub rejected: Vec<ReservationId>,
    /// Admitted requests the grid could not fully seat
    pub incomplete: Vec<ReservationId>,
    /// Outcome tallies
    pub counters: OutcomeCounters,
}

impl SeatingReport {
    /// Takes a snapshot of `state`
    #[must_use]
    pub fn from_state(state: &SeatingState) -> Self {
        Self {
            seating_map: state.grid().render(),
            manifest: state.ledger().manifest_lines().collect(),
            rejected: state.rejected().to_vec(),
            incomplete: state.incomplete().to_vec(),
            counters: *state.counters(),
        }
    }

    /// Rejected ids, space separated
    #[must_use]
    pub fn rejected_line(&self) -> String {
        join_ids(&self.rejected)
    }

    /// Incomplete ids, space separated
    #[must_use]
    pub fn incomplete_line(&self) -> String {
        join_ids(&self.incomplete)
    }

    /// Returns `true` if any admitted request ran out of grid
    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.incomplete.is_empty()
    }

    /// Status summary renderer
    #[must_use]
    pub const fn status(&self) -> StatusSummary {
        StatusSummary(self.counters)
    }
}

fn join_ids(ids: &[ReservationId]) -> String {
    ids.iter()
        .map(ReservationId::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Outcome counts, one per line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSummary(pub OutcomeCounters);

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counters = &self.0;
        writeln!(f, "Total reservations: {}", counters.total())?;
        writeln!(f, "Seated together: {}", counters.together)?;
        writeln!(f, "Seated split: {}", counters.split)?;
        writeln!(f, "Rejected, exceeds capacity: {}", counters.exceeds_capacity)?;
        write!(f, "Rejected, invalid: {}", counters.invalid)?;
        if counters.incomplete > 0 {
            write!(f, "\nIncomplete, grid exhausted: {}", counters.incomplete)?;
        }
        Ok(())
    }
}
