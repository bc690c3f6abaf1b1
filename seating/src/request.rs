//! Request line parsing.
//!
//! Input lines look like `<reservation-id> <seat-count>`, whitespace
//! delimited. Tokens after the count are ignored.

use crate::aggregate::SeatingAction;
use crate::types::ReservationId;
use std::str::FromStr;
use thiserror::Error;

/// A parsed reservation request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationRequest {
    /// Reservation identifier (first token)
    pub reservation_id: ReservationId,
    /// Requested seat count as written; may be zero or negative
    pub seats: i64,
}

/// Reasons a request line could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The line has no tokens
    #[error("request line is blank")]
    Blank,

    /// The line has an id but no seat count
    #[error("reservation {reservation_id} has no seat count")]
    MissingCount {
        /// Reservation the line belongs to
        reservation_id: ReservationId,
    },

    /// The seat count is not an integer
    #[error("reservation {reservation_id} has unreadable seat count {raw:?}")]
    UnreadableCount {
        /// Reservation the line belongs to
        reservation_id: ReservationId,
        /// The offending token
        raw: String,
    },
}

impl RequestError {
    /// Reservation the failed line belongs to, if it had an id
    #[must_use]
    pub const fn reservation_id(&self) -> Option<&ReservationId> {
        match self {
            Self::Blank => None,
            Self::MissingCount { reservation_id } | Self::UnreadableCount { reservation_id, .. } => {
                Some(reservation_id)
            },
        }
    }
}

impl FromStr for ReservationRequest {
    type Err = RequestError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let reservation_id = tokens.next().map(ReservationId::from).ok_or(RequestError::Blank)?;
        let raw = tokens.next().ok_or_else(|| RequestError::MissingCount {
            reservation_id: reservation_id.clone(),
        })?;
        let seats = raw.parse().map_err(|_| RequestError::UnreadableCount {
            reservation_id: reservation_id.clone(),
            raw: raw.to_string(),
        })?;

        Ok(Self {
            reservation_id,
            seats,
        })
    }
}

impl From<ReservationRequest> for SeatingAction {
    fn from(request: ReservationRequest) -> Self {
        Self::ReserveSeats {
            reservation_id: request.reservation_id,
            seats: request.seats,
        }
    }
}

/// Turns one input line into the command to send, if the line is a request
///
/// Blank lines yield `None`. Lines with an id but no usable count become
/// `RejectMalformed` so they are still counted and reported.
#[must_use]
pub fn parse_line(line: &str) -> Option<SeatingAction> {
    match line.parse::<ReservationRequest>() {
        Ok(request) => Some(request.into()),
        Err(RequestError::Blank) => None,
        Err(error) => {
            let reservation_id = error.reservation_id()?.clone();
            Some(SeatingAction::RejectMalformed {
                reservation_id,
                detail: error.to_string(),
            })
        },
    }
}
