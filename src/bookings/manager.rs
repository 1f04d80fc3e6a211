//! Booking manager implementation.

use crate::error::{EngineError, Result};
use crate::seats::SeatTable;
use crate::types::{ConnectionId, SeatId};
use std::sync::Arc;
use tracing::info;

/// Implements booking and booking-release on the seat table.
pub struct BookingManager {
    table: Arc<SeatTable>,
}

impl BookingManager {
    pub fn new(table: Arc<SeatTable>) -> Self {
        Self { table }
    }

    /// Book a seat for `name`.
    ///
    /// A prior lock is not required, but a lock held by a different
    /// connection blocks the booking. On success the seat's lock fields are
    /// left as-is: the holder's own lock stays on the booked seat, closing
    /// the window where another connection's acquire could land between the
    /// booking and its clients observing the booked snapshot. The
    /// generation bump invalidates the pending expiry so the retained lock
    /// never lapses.
    pub fn book(&self, seat: SeatId, conn: ConnectionId, name: &str) -> Result<()> {
        self.table.update(seat, |s| {
            if s.booked {
                return Err(EngineError::AlreadyBooked(seat));
            }
            if s.locked && !s.locked_by(conn) {
                return Err(EngineError::LockedByOther(seat));
            }

            s.booked = true;
            s.user = Some(name.to_string());
            s.lock_generation += 1;
            Ok(())
        })?;

        info!(seat = %seat, conn = %conn, user = %name, "seat booked");
        Ok(())
    }

    /// Release a booked seat.
    ///
    /// Ownership is checked by display name, not connection: bookings
    /// outlive the connection that made them. On success every field
    /// (booking, vestigial lock, owner) is cleared unconditionally and the
    /// seat returns to fully free.
    pub fn release(&self, seat: SeatId, name: &str) -> Result<()> {
        self.table.update(seat, |s| {
            if !s.booked || s.user.as_deref() != Some(name) {
                return Err(EngineError::NotOwner(seat));
            }

            s.booked = false;
            s.clear_lock();
            Ok(())
        })?;

        info!(seat = %seat, user = %name, "booking released");
        Ok(())
    }

    /// Whether `name` currently owns at least one booked seat.
    ///
    /// Drives the session retention decision on disconnect.
    pub fn holds_any_booking(&self, name: &str) -> bool {
        self.table
            .read_all(|seats| seats.iter().any(|s| s.booked && s.user.as_deref() == Some(name)))
    }
}
