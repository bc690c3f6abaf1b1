//! Ticket ledger: which seat labels were issued to which reservation.

use crate::types::{ReservationId, SeatLabel};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Seats issued per reservation
///
/// Reservations iterate in sorted id order; seats within a reservation keep
/// assignment order. Entries are only ever appended. A reservation id seen
/// twice in the input accumulates the seats of both requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketLedger {
    tickets: BTreeMap<ReservationId, Vec<SeatLabel>>,
}

impl TicketLedger {
    /// Creates an empty ledger
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tickets: BTreeMap::new(),
        }
    }

    /// Issues one seat to a reservation
    pub fn issue(&mut self, reservation_id: &ReservationId, seat: SeatLabel) {
        self.tickets
            .entry(reservation_id.clone())
            .or_default()
            .push(seat);
    }

    /// Seats issued to a reservation, in assignment order
    #[must_use]
    pub fn seats_for(&self, reservation_id: &ReservationId) -> &[SeatLabel] {
        self.tickets.get(reservation_id).map_or(&[][..], Vec::as_slice)
    }

    /// Reservations and their seats, in sorted id order
    pub fn iter(&self) -> impl Iterator<Item = (&ReservationId, &[SeatLabel])> {
        self.tickets.iter().map(|(id, seats)| (id, seats.as_slice()))
    }

    /// Number of reservations holding at least one seat
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// Returns `true` if no seat has been issued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Total seats issued
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.tickets.values().map(Vec::len).sum()
    }

    /// Manifest lines: `<reservation-id> <seat> <seat> ...`
    pub fn manifest_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|(id, seats)| {
            let mut line = id.to_string();
            for seat in seats {
                line.push(' ');
                line.push_str(seat.as_str());
            }
            line
        })
    }

    /// Writes the manifest, one newline-terminated line per reservation
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_manifest<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for line in self.manifest_lines() {
            writeln!(writer, "{line}")?;
        }
        writer.flush()
    }
}
