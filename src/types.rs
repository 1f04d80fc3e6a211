//! Core types for the seat coordinator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Unique identifier for a seat (1-based, stable for the process lifetime).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatId(pub u32);

impl fmt::Debug for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeatId({})", self.0)
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque connection identity (assigned by the engine when a transport
/// connection subscribes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({})", self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single seat in the coordinator's table.
///
/// Seats are created once at startup and mutated in place. The lock fields
/// (`lock_owner`, `lock_acquired_at`, `lock_generation`) are internal to the
/// soft-lock protocol and never leave the process; clients only see the
/// [`SeatView`] projection.
#[derive(Clone, Debug)]
pub struct Seat {
    /// Stable identifier (1..=N).
    pub id: SeatId,

    /// Final reservation state.
    pub booked: bool,

    /// Display-name owner, set while locked or booked.
    pub user: Option<String>,

    /// Transient soft-reservation flag.
    pub locked: bool,

    /// When the current lock was acquired (expiry arithmetic only).
    pub lock_acquired_at: Option<Instant>,

    /// Connection that acquired the lock; authorizes release and expiry.
    pub lock_owner: Option<ConnectionId>,

    /// Bumped by every mutation that supersedes a pending expiry
    /// (acquire, release, book, release-booking, disconnect sweep).
    /// A scheduled expiry fires only if its captured generation still matches.
    pub lock_generation: u64,
}

impl Seat {
    /// A free seat with the given id.
    pub fn vacant(id: SeatId) -> Self {
        Self {
            id,
            booked: false,
            user: None,
            locked: false,
            lock_acquired_at: None,
            lock_owner: None,
            lock_generation: 0,
        }
    }

    /// Whether `conn` currently holds this seat's lock.
    pub fn locked_by(&self, conn: ConnectionId) -> bool {
        self.locked && self.lock_owner == Some(conn)
    }

    /// Clear every lock field and the display-name owner.
    ///
    /// Callers are responsible for checking eligibility first; this also
    /// bumps the generation so any pending expiry becomes a no-op.
    pub fn clear_lock(&mut self) {
        self.locked = false;
        self.user = None;
        self.lock_acquired_at = None;
        self.lock_owner = None;
        self.lock_generation += 1;
    }
}

/// Client-facing projection of a seat.
///
/// This is the exact shape broadcast to connections: lock timestamps and
/// owning connection ids stay server-side, so "is this my lock" remains
/// derivable only by the client that holds it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub id: SeatId,
    pub booked: bool,
    pub user: Option<String>,
    pub locked: bool,
}

impl From<&Seat> for SeatView {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id,
            booked: seat.booked,
            user: seat.user.clone(),
            locked: seat.locked,
        }
    }
}

/// An active display-name session.
///
/// `connection` is `None` while the holder is disconnected but the session
/// is retained because the name still owns booked seats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub connection: Option<ConnectionId>,
}

impl Session {
    /// A fresh session not yet bound to a connection.
    pub fn detached(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connection: None,
        }
    }
}
