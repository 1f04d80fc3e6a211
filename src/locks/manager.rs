//! Lock manager implementation.

use crate::error::{EngineError, Result};
use crate::seats::SeatTable;
use crate::types::{ConnectionId, SeatId};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::expiry::{ExpiryScheduler, LockExpiry};

/// Implements acquire, release, and expiry of soft locks on the seat table.
pub struct LockManager {
    /// Shared seat table.
    table: Arc<SeatTable>,

    /// Expiry worker; fires the engine's expiry callback at deadlines.
    scheduler: ExpiryScheduler,

    /// How long an unrefreshed lock survives.
    timeout: Duration,
}

impl LockManager {
    /// Create a lock manager over `table` with the given lock timeout.
    pub fn new(table: Arc<SeatTable>, scheduler: ExpiryScheduler, timeout: Duration) -> Self {
        Self {
            table,
            scheduler,
            timeout,
        }
    }

    /// Acquire (or refresh) the soft lock on a seat.
    ///
    /// Fails with `AlreadyBooked` if the seat is booked and `LockedByOther`
    /// if a different connection holds the lock; neither failure mutates the
    /// seat. Re-acquiring a lock you already hold refreshes its timestamp
    /// and generation, superseding the previously scheduled expiry.
    pub fn acquire(&self, seat: SeatId, conn: ConnectionId, name: &str) -> Result<()> {
        let now = Instant::now();

        let generation = self.table.update(seat, |s| {
            if s.booked {
                return Err(EngineError::AlreadyBooked(seat));
            }
            if s.locked && !s.locked_by(conn) {
                return Err(EngineError::LockedByOther(seat));
            }

            s.locked = true;
            s.user = Some(name.to_string());
            s.lock_owner = Some(conn);
            s.lock_acquired_at = Some(now);
            s.lock_generation += 1;
            Ok(s.lock_generation)
        })?;

        self.scheduler.schedule(
            now + self.timeout,
            LockExpiry {
                seat,
                conn,
                generation,
            },
        );

        info!(seat = %seat, conn = %conn, user = %name, "lock acquired");
        Ok(())
    }

    /// Release a lock held by `conn`.
    ///
    /// Succeeds only when the seat is locked by `conn` and not booked.
    /// Releasing a booked seat fails with `AlreadyBooked` and never clears
    /// ownership; releasing someone else's lock fails with `NotOwner`.
    pub fn release(&self, seat: SeatId, conn: ConnectionId) -> Result<()> {
        self.table.update(seat, |s| {
            if s.booked {
                return Err(EngineError::AlreadyBooked(seat));
            }
            if !s.locked_by(conn) {
                return Err(EngineError::NotOwner(seat));
            }
            s.clear_lock();
            Ok(())
        })?;

        info!(seat = %seat, conn = %conn, "lock released");
        Ok(())
    }

    /// Release every lock held by a disconnecting connection.
    ///
    /// One pass under a single write guard, applying the same eligibility
    /// rule as [`release`](Self::release). Returns the cleared seat ids.
    pub fn release_all_for_connection(&self, conn: ConnectionId) -> Vec<SeatId> {
        let cleared = self.table.sweep(|s| {
            if s.locked_by(conn) && !s.booked {
                s.clear_lock();
                true
            } else {
                false
            }
        });

        if !cleared.is_empty() {
            info!(conn = %conn, seats = ?cleared, "released locks on disconnect");
        }
        cleared
    }

    /// Apply a fired expiry against the live seat.
    ///
    /// Clears the lock exactly as `release` does, but only if the seat is
    /// still locked by the same connection, at the same generation, and not
    /// booked. Returns whether anything was cleared (the caller broadcasts
    /// only then).
    pub fn apply_expiry(table: &SeatTable, expiry: LockExpiry) -> bool {
        let cleared = table
            .update(expiry.seat, |s| {
                let current = s.locked
                    && s.lock_owner == Some(expiry.conn)
                    && s.lock_generation == expiry.generation
                    && !s.booked;
                if current {
                    s.clear_lock();
                }
                Ok(current)
            })
            .unwrap_or(false);

        if !cleared {
            debug!(seat = %expiry.seat, conn = %expiry.conn, "stale expiry ignored");
        }
        cleared
    }
}
