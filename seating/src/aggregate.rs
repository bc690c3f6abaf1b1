//! Seating aggregate.
//!
//! Owns the grid, the ticket ledger and the outcome counters for one run.
//! Requests arrive as commands; every command produces exactly one event,
//! which is applied to the bookkeeping state and published as an allocation
//! record.
//!
//! Requests are reduced strictly one at a time. Later requests see the buffer
//! footprint of every earlier one, so request order decides the final layout.

use crate::buffer::BufferZone;
use crate::grid::SeatGrid;
use crate::ledger::TicketLedger;
use crate::placement::{BottomUp, PlacementEngine, PlacementError, ScanPolicy};
use crate::report::SeatingReport;
use crate::types::{
    OutcomeCounters, RejectionReason, ReservationId, SeatLabel, SeatingMode, Span, TheaterLayout,
};
use seatplan_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// State
// ============================================================================

/// Everything one allocation run accumulates
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatingState {
    layout: TheaterLayout,
    grid: SeatGrid,
    ledger: TicketLedger,
    counters: OutcomeCounters,
    rejected: Vec<ReservationId>,
    incomplete: Vec<ReservationId>,
}

impl SeatingState {
    /// Creates an empty state for the given layout
    #[must_use]
    pub fn new(layout: TheaterLayout) -> Self {
        Self {
            layout,
            grid: SeatGrid::new(layout.rows, layout.cols),
            ledger: TicketLedger::new(),
            counters: OutcomeCounters::default(),
            rejected: Vec::new(),
            incomplete: Vec::new(),
        }
    }

    /// Layout the state was created with
    #[must_use]
    pub const fn layout(&self) -> &TheaterLayout {
        &self.layout
    }

    /// Current occupancy
    #[must_use]
    pub const fn grid(&self) -> &SeatGrid {
        &self.grid
    }

    /// Tickets issued so far
    #[must_use]
    pub const fn ledger(&self) -> &TicketLedger {
        &self.ledger
    }

    /// Outcome tallies so far
    #[must_use]
    pub const fn counters(&self) -> &OutcomeCounters {
        &self.counters
    }

    /// Ids of rejected requests, in encounter order
    #[must_use]
    pub fn rejected(&self) -> &[ReservationId] {
        &self.rejected
    }

    /// Ids of admitted requests the grid could not fully seat, in encounter order
    #[must_use]
    pub fn incomplete(&self) -> &[ReservationId] {
        &self.incomplete
    }

    /// Read-only snapshot for reporting
    #[must_use]
    pub fn report(&self) -> SeatingReport {
        SeatingReport::from_state(self)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Commands and events of the seating aggregate
///
/// Events double as the structured allocation records handed to observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeatingAction {
    // Commands
    /// Seat a reservation
    ReserveSeats {
        /// Reservation identifier
        reservation_id: ReservationId,
        /// Requested seat count as read; validated by the reducer
        seats: i64,
    },

    /// Record a request line whose seat count could not be read
    RejectMalformed {
        /// Reservation identifier (first token of the line)
        reservation_id: ReservationId,
        /// What was wrong with the line
        detail: String,
    },

    // Events
    /// Every requested seat was placed
    SeatsAssigned {
        /// Reservation identifier
        reservation_id: ReservationId,
        /// Issued seat labels, in assignment order
        seats: Vec<SeatLabel>,
        /// Seated spans, in assignment order
        spans: Vec<Span>,
        /// Together or split
        mode: SeatingMode,
    },

    /// The request was turned away before placement
    ReservationRejected {
        /// Reservation identifier
        reservation_id: ReservationId,
        /// Seat count as read, if there was one
        requested: Option<i64>,
        /// Why it was turned away
        reason: RejectionReason,
    },

    /// The grid ran out part way through an admitted request
    ///
    /// Seats placed before that point are kept.
    AllocationFailed {
        /// Reservation identifier
        reservation_id: ReservationId,
        /// Seats asked for
        requested: usize,
        /// Seats actually placed
        placed: usize,
    },
}

impl SeatingAction {
    /// Returns `true` for commands
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(self, Self::ReserveSeats { .. } | Self::RejectMalformed { .. })
    }

    /// Returns `true` for events
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }

    /// Reservation the action concerns
    #[must_use]
    pub const fn reservation_id(&self) -> &ReservationId {
        match self {
            Self::ReserveSeats { reservation_id, .. }
            | Self::RejectMalformed { reservation_id, .. }
            | Self::SeatsAssigned { reservation_id, .. }
            | Self::ReservationRejected { reservation_id, .. }
            | Self::AllocationFailed { reservation_id, .. } => reservation_id,
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Injected policies for the seating reducer
#[derive(Clone, Debug)]
pub struct SeatingEnvironment {
    /// Row visiting order used by the placement engine
    pub policy: Arc<dyn ScanPolicy>,
}

impl SeatingEnvironment {
    /// Creates a new `SeatingEnvironment`
    #[must_use]
    pub fn new(policy: Arc<dyn ScanPolicy>) -> Self {
        Self { policy }
    }
}

impl Default for SeatingEnvironment {
    fn default() -> Self {
        Self::new(Arc::new(BottomUp))
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the seating aggregate
#[derive(Clone, Copy, Debug, Default)]
pub struct SeatingReducer;

impl SeatingReducer {
    /// Creates a new `SeatingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Admission check for `ReserveSeats`
    ///
    /// The ceiling is the nominal grid size, not what is still free.
    fn validate_reserve_seats(layout: &TheaterLayout, seats: i64) -> Result<usize, RejectionReason> {
        if seats <= 0 {
            return Err(RejectionReason::InvalidCount);
        }
        let count = usize::try_from(seats).map_err(|_| RejectionReason::ExceedsCapacity)?;
        if count > layout.nominal_capacity() {
            return Err(RejectionReason::ExceedsCapacity);
        }
        Ok(count)
    }

    /// Applies an event to the bookkeeping state
    ///
    /// Grid and ledger are written by the placement engine while handling the
    /// command; events only move counters and reports.
    fn apply_event(state: &mut SeatingState, action: &SeatingAction) {
        match action {
            SeatingAction::SeatsAssigned { mode, .. } => {
                state.counters.record_seated(*mode);
            },
            SeatingAction::ReservationRejected {
                reservation_id,
                reason,
                ..
            } => {
                state.counters.record_rejected(*reason);
                state.rejected.push(reservation_id.clone());
            },
            SeatingAction::AllocationFailed { reservation_id, .. } => {
                state.counters.record_incomplete();
                state.incomplete.push(reservation_id.clone());
            },
            SeatingAction::ReserveSeats { .. } | SeatingAction::RejectMalformed { .. } => {},
        }
    }

    /// Applies the event and hands it to observers
    fn emit(
        state: &mut SeatingState,
        event: SeatingAction,
    ) -> SmallVec<[Effect<SeatingAction>; 4]> {
        Self::apply_event(state, &event);
        smallvec![Effect::Publish(event)]
    }
}

impl Reducer for SeatingReducer {
    type State = SeatingState;
    type Action = SeatingAction;
    type Environment = SeatingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            SeatingAction::ReserveSeats {
                reservation_id,
                seats,
            } => {
                let count = match Self::validate_reserve_seats(&state.layout, seats) {
                    Ok(count) => count,
                    Err(reason) => {
                        tracing::warn!(%reservation_id, seats, %reason, "reservation rejected");
                        return Self::emit(
                            state,
                            SeatingAction::ReservationRejected {
                                reservation_id,
                                requested: Some(seats),
                                reason,
                            },
                        );
                    },
                };

                let buffer = BufferZone::new(state.layout.row_buffer, state.layout.col_buffer);
                let result = PlacementEngine::new(
                    &mut state.grid,
                    &mut state.ledger,
                    buffer,
                    env.policy.as_ref(),
                )
                .place(&reservation_id, count);

                let event = match result {
                    Ok(placement) => {
                        tracing::info!(
                            %reservation_id,
                            seats = count,
                            mode = %placement.mode,
                            spans = placement.spans.len(),
                            "seats assigned"
                        );
                        SeatingAction::SeatsAssigned {
                            reservation_id,
                            seats: placement.seats,
                            spans: placement.spans,
                            mode: placement.mode,
                        }
                    },
                    Err(PlacementError::GridExhausted { requested, placed }) => {
                        tracing::error!(
                            %reservation_id,
                            requested,
                            placed,
                            remaining = state.grid.capacity(),
                            "grid exhausted for an admitted reservation"
                        );
                        SeatingAction::AllocationFailed {
                            reservation_id,
                            requested,
                            placed,
                        }
                    },
                };

                Self::emit(state, event)
            },

            SeatingAction::RejectMalformed {
                reservation_id,
                detail,
            } => {
                tracing::warn!(%reservation_id, %detail, "malformed request");
                Self::emit(
                    state,
                    SeatingAction::ReservationRejected {
                        reservation_id,
                        requested: None,
                        reason: RejectionReason::Malformed,
                    },
                )
            },

            // ========== Events ==========
            event @ (SeatingAction::SeatsAssigned { .. }
            | SeatingAction::ReservationRejected { .. }
            | SeatingAction::AllocationFailed { .. }) => {
                Self::apply_event(state, &event);
                SmallVec::new()
            },
        }
    }
}
