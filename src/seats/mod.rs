//! The fixed seat table.
//!
//! A pure state container: one ordered, fixed-size arena of [`Seat`]
//! records behind a single lock. All mutation flows through closures
//! executed under the write guard, so every check-then-set sequence in the
//! lock and booking managers is atomic with respect to other mutations.
//!
//! [`Seat`]: crate::types::Seat

mod table;

pub use table::SeatTable;
