//! # Seat Coordinator
//!
//! An in-memory engine coordinating concurrent reservation of a fixed pool
//! of seats across many simultaneously connected clients.
//!
//! ## Core Concepts
//!
//! - **Seats**: A fixed arena of records, mutated in place, never resized
//! - **Locks**: Time-bounded soft reservations that expire if abandoned
//! - **Bookings**: Final reservations owned by display name, surviving
//!   reconnects
//! - **Snapshots**: Full-state broadcasts after every successful mutation;
//!   clients always replace, never merge
//!
//! ## Example
//!
//! ```ignore
//! use usher::{Engine, EngineConfig, SeatId};
//!
//! let engine = Engine::new(EngineConfig::default());
//!
//! // Transport-side: claim a name, open a connection.
//! let session = engine.login("ada")?;
//! let handle = engine.connect();
//! engine.associate_identity("ada", handle.connection)?;
//!
//! // Select, then commit.
//! engine.acquire_lock(SeatId(7), handle.connection, "ada")?;
//! engine.book(SeatId(7), handle.connection, "ada")?;
//! ```

pub mod bookings;
pub mod engine;
pub mod error;
pub mod locks;
pub mod seats;
pub mod sessions;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use bookings::BookingManager;
pub use engine::{Engine, EngineConfig};
pub use error::{EngineError, Result};
pub use locks::{ExpiryScheduler, LockExpiry, LockManager};
pub use seats::SeatTable;
pub use sessions::SessionRegistry;
pub use subscriptions::{
    DropReason, EngineEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionManager,
};
pub use types::*;
