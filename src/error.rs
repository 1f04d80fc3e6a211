//! Error types for the seat coordinator.

use crate::types::SeatId;
use thiserror::Error;

/// Main error type for engine operations.
///
/// Every variant is an expected, recoverable, caller-facing outcome; none is
/// fatal to the process and none triggers a broadcast (a failed operation
/// performs no mutation). Retry policy, if any, belongs to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Seat not found: {0}")]
    SeatNotFound(SeatId),

    #[error("Seat already booked: {0}")]
    AlreadyBooked(SeatId),

    #[error("Seat locked by another connection: {0}")]
    LockedByOther(SeatId),

    #[error("Not the owner of seat {0}")]
    NotOwner(SeatId),

    #[error("Display name already in use: {0}")]
    NameTaken(String),

    #[error("No session for display name: {0}")]
    SessionNotFound(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
