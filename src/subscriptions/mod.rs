//! Subscription system for live seat updates.
//!
//! In-process subscriptions stand in for the real-time transport: each
//! connected client holds a [`SubscriptionHandle`] and receives the full
//! seat snapshot after every successful mutation or lock expiry.
//!
//! Delivery is fire-and-forget over bounded buffers; a subscriber that
//! cannot keep up is dropped rather than allowed to stall the engine.
//!
//! # Example
//!
//! ```ignore
//! let engine = Engine::new(EngineConfig::default());
//! let handle = engine.connect();
//!
//! loop {
//!     match handle.recv() {
//!         Ok(EngineEvent::SeatSnapshot { seats }) => render(&seats),
//!         Ok(EngineEvent::Dropped { .. }) => break,
//!         Err(_) => break,
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{DropReason, EngineEvent, SubscriptionConfig, SubscriptionHandle};
