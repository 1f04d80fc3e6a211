//! Seat table implementation.

use crate::error::{EngineError, Result};
use crate::types::{Seat, SeatId, SeatView};
use parking_lot::RwLock;

/// Fixed-size table of seats, indexed by 1-based [`SeatId`].
///
/// Seats are created once at construction and never added or removed. The
/// table hands out no references; callers pass closures that run under the
/// guard, which keeps the critical section free of I/O by construction.
pub struct SeatTable {
    seats: RwLock<Vec<Seat>>,
}

impl SeatTable {
    /// Create a table of `count` vacant seats with ids `1..=count`.
    pub fn new(count: usize) -> Self {
        let seats = (1..=count as u32).map(|id| Seat::vacant(SeatId(id))).collect();
        Self {
            seats: RwLock::new(seats),
        }
    }

    /// Number of seats in the table.
    pub fn len(&self) -> usize {
        self.seats.read().len()
    }

    /// Whether the table is empty (only for zero-seat configurations).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against one seat under the write guard.
    ///
    /// The closure's check-then-set runs atomically; returning an error from
    /// `f` must leave the seat unmodified (the managers uphold this).
    pub fn update<T>(&self, id: SeatId, f: impl FnOnce(&mut Seat) -> Result<T>) -> Result<T> {
        let mut seats = self.seats.write();
        let seat = Self::slot_mut(&mut seats, id)?;
        f(seat)
    }

    /// Run `f` against one seat under the read guard.
    pub fn read<T>(&self, id: SeatId, f: impl FnOnce(&Seat) -> T) -> Result<T> {
        let seats = self.seats.read();
        let seat = Self::slot(&seats, id)?;
        Ok(f(seat))
    }

    /// Run `f` against the whole table under the read guard.
    pub fn read_all<T>(&self, f: impl FnOnce(&[Seat]) -> T) -> T {
        f(&self.seats.read())
    }

    /// Apply `f` to every seat under one write guard.
    ///
    /// Returns the ids of seats where `f` reported a mutation. Used by the
    /// disconnect path so the whole sweep is a single critical section.
    pub fn sweep(&self, mut f: impl FnMut(&mut Seat) -> bool) -> Vec<SeatId> {
        let mut seats = self.seats.write();
        let mut touched = Vec::new();
        for seat in seats.iter_mut() {
            if f(seat) {
                touched.push(seat.id);
            }
        }
        touched
    }

    /// Ordered full-state projection for broadcasting.
    pub fn snapshot(&self) -> Vec<SeatView> {
        self.seats.read().iter().map(SeatView::from).collect()
    }

    fn slot<'a>(seats: &'a [Seat], id: SeatId) -> Result<&'a Seat> {
        let index = Self::index_of(seats.len(), id)?;
        Ok(&seats[index])
    }

    fn slot_mut<'a>(seats: &'a mut [Seat], id: SeatId) -> Result<&'a mut Seat> {
        let index = Self::index_of(seats.len(), id)?;
        Ok(&mut seats[index])
    }

    fn index_of(len: usize, id: SeatId) -> Result<usize> {
        if id.0 == 0 || id.0 as usize > len {
            return Err(EngineError::SeatNotFound(id));
        }
        Ok(id.0 as usize - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectionId;

    #[test]
    fn test_new_table_is_vacant() {
        let table = SeatTable::new(50);
        assert_eq!(table.len(), 50);

        let snapshot = table.snapshot();
        assert_eq!(snapshot.len(), 50);
        assert!(snapshot.iter().all(|s| !s.booked && !s.locked && s.user.is_none()));
        assert_eq!(snapshot[0].id, SeatId(1));
        assert_eq!(snapshot[49].id, SeatId(50));
    }

    #[test]
    fn test_unknown_seat_reported() {
        let table = SeatTable::new(3);

        let result = table.read(SeatId(0), |_| ());
        assert_eq!(result, Err(EngineError::SeatNotFound(SeatId(0))));

        let result = table.update(SeatId(4), |_| Ok(()));
        assert_eq!(result, Err(EngineError::SeatNotFound(SeatId(4))));
    }

    #[test]
    fn test_update_mutates_in_place() {
        let table = SeatTable::new(3);

        table
            .update(SeatId(2), |seat| {
                seat.locked = true;
                seat.lock_owner = Some(ConnectionId(1));
                seat.user = Some("ada".to_string());
                Ok(())
            })
            .unwrap();

        let locked = table.read(SeatId(2), |s| s.locked).unwrap();
        assert!(locked);

        let snapshot = table.snapshot();
        assert!(snapshot[1].locked);
        assert_eq!(snapshot[1].user.as_deref(), Some("ada"));
        assert!(!snapshot[0].locked);
    }

    #[test]
    fn test_sweep_reports_touched_seats() {
        let table = SeatTable::new(5);
        for id in [1u32, 3, 5] {
            table
                .update(SeatId(id), |seat| {
                    seat.locked = true;
                    seat.lock_owner = Some(ConnectionId(7));
                    Ok(())
                })
                .unwrap();
        }

        let touched = table.sweep(|seat| {
            if seat.locked_by(ConnectionId(7)) {
                seat.clear_lock();
                true
            } else {
                false
            }
        });

        assert_eq!(touched, vec![SeatId(1), SeatId(3), SeatId(5)]);
        assert!(table.snapshot().iter().all(|s| !s.locked));
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let table = SeatTable::new(10);
        let ids: Vec<u32> = table.snapshot().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }
}
