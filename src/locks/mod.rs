//! The soft-lock protocol.
//!
//! A lock is a time-bounded claim on a seat: it keeps other connections
//! from booking the seat while its holder decides, and it evaporates on its
//! own if the holder walks away. Every acquisition bumps the seat's
//! generation counter and schedules exactly one expiry for that generation;
//! any competing mutation bumps the counter again, so a stale timer can
//! never clear a refreshed, released, or booked seat.

mod expiry;
mod manager;

pub use expiry::{ExpiryScheduler, LockExpiry};
pub use manager::LockManager;
