//! Display-name sessions.
//!
//! A session is a claim on a display name. It is created at login before
//! any real-time connection exists, bound to a connection by
//! `associate`, and outlives disconnects for as long as the name owns
//! booked seats; bookings are keyed by name precisely so they survive
//! reconnection under a fresh connection identity.

mod registry;

pub use registry::SessionRegistry;
