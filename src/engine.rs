//! Main Engine struct tying all components together.

use crate::bookings::BookingManager;
use crate::error::Result;
use crate::locks::{ExpiryScheduler, LockManager};
use crate::seats::SeatTable;
use crate::sessions::SessionRegistry;
use crate::subscriptions::{EngineEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionManager};
use crate::types::{ConnectionId, SeatId, SeatView, Session};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Default number of seats in the pool.
const DEFAULT_SEAT_COUNT: usize = 50;

/// Default lock timeout (30 seconds).
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Engine configuration.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Number of seats, ids `1..=seat_count`.
    pub seat_count: usize,

    /// How long an unrefreshed soft lock survives.
    pub lock_timeout: Duration,

    /// Per-subscriber event buffer size.
    pub broadcast_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seat_count: DEFAULT_SEAT_COUNT,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            broadcast_buffer: SubscriptionConfig::default().buffer_size,
        }
    }
}

/// The seat reservation coordinator.
///
/// One authoritative in-memory instance per process. All seat mutations are
/// serialized against the shared table; every successful mutation (and
/// every fired lock expiry) is followed by exactly one full-state broadcast
/// to all subscribed connections. Failed operations return a typed error to
/// the caller only and never broadcast.
pub struct Engine {
    config: EngineConfig,

    /// The seat arena (shared with the expiry callback).
    table: Arc<SeatTable>,

    /// Soft-lock protocol.
    locks: LockManager,

    /// Final booking transitions.
    bookings: BookingManager,

    /// Display-name sessions.
    sessions: SessionRegistry,

    /// Live subscriptions (shared with the expiry callback).
    subscriptions: Arc<SubscriptionManager>,

    /// Counter for allocating connection identities.
    next_connection: AtomicU64,
}

impl Engine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        let table = Arc::new(SeatTable::new(config.seat_count));
        let subscriptions = Arc::new(SubscriptionManager::new());

        // The expiry worker re-validates under the table lock, then
        // broadcasts, the same mutate-then-broadcast order as every
        // caller-driven operation.
        let scheduler = {
            let table = Arc::clone(&table);
            let subscriptions = Arc::clone(&subscriptions);
            ExpiryScheduler::start(move |expiry| {
                if LockManager::apply_expiry(&table, expiry) {
                    info!(seat = %expiry.seat, conn = %expiry.conn, "lock expired");
                    subscriptions.broadcast_snapshot(&table.snapshot());
                }
            })
        };

        let locks = LockManager::new(Arc::clone(&table), scheduler, config.lock_timeout);
        let bookings = BookingManager::new(Arc::clone(&table));

        Self {
            config,
            table,
            locks,
            bookings,
            sessions: SessionRegistry::new(),
            subscriptions,
            next_connection: AtomicU64::new(1),
        }
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Login & Identity ---

    /// Claim a display name (the request/response side-channel).
    pub fn login(&self, name: &str) -> Result<Session> {
        self.sessions.login(name)
    }

    /// Bind a connection to a logged-in name.
    ///
    /// Called on first connect and again after reconnects so that
    /// name-keyed booking ownership survives connection churn.
    pub fn associate_identity(&self, name: &str, conn: ConnectionId) -> Result<()> {
        self.sessions.associate(name, conn)
    }

    // --- Connections ---

    /// Register a new real-time connection.
    ///
    /// Allocates a connection identity, subscribes it to broadcasts, and
    /// immediately delivers the current snapshot so the client renders
    /// authoritative state before any mutation of its own.
    pub fn connect(&self) -> SubscriptionHandle {
        let conn = ConnectionId(self.next_connection.fetch_add(1, Ordering::SeqCst));
        let handle = self.subscriptions.subscribe(
            conn,
            SubscriptionConfig {
                buffer_size: self.config.broadcast_buffer,
            },
        );

        self.subscriptions.send_to(
            conn,
            EngineEvent::SeatSnapshot {
                seats: self.table.snapshot(),
            },
        );

        info!(conn = %conn, "connection registered");
        handle
    }

    /// Tear down a dying connection.
    ///
    /// Two-step reconciliation, in this order: release every lock the
    /// connection held (broadcasting if anything cleared), then decide
    /// session retention: the name is freed only when it owns zero booked
    /// seats, otherwise the session is kept detached so its bookings
    /// survive until reconnect.
    pub fn disconnect(&self, conn: ConnectionId) {
        self.subscriptions.unsubscribe(conn);

        let cleared = self.locks.release_all_for_connection(conn);
        if !cleared.is_empty() {
            self.broadcast();
        }

        if let Some(name) = self.sessions.disconnect(conn) {
            if self.bookings.holds_any_booking(&name) {
                info!(conn = %conn, user = %name, "session retained (holds bookings)");
            } else {
                self.sessions.remove(&name);
            }
        }
    }

    // --- Seat Operations ---

    /// Acquire (or refresh) the soft lock on a seat.
    pub fn acquire_lock(&self, seat: SeatId, conn: ConnectionId, name: &str) -> Result<()> {
        self.locks.acquire(seat, conn, name)?;
        self.broadcast();
        Ok(())
    }

    /// Release a soft lock held by `conn`.
    pub fn release_lock(&self, seat: SeatId, conn: ConnectionId) -> Result<()> {
        self.locks.release(seat, conn)?;
        self.broadcast();
        Ok(())
    }

    /// Book a seat for `name`.
    pub fn book(&self, seat: SeatId, conn: ConnectionId, name: &str) -> Result<()> {
        self.bookings.book(seat, conn, name)?;
        self.broadcast();
        Ok(())
    }

    /// Release a booked seat owned by `name`.
    pub fn release_booking(&self, seat: SeatId, name: &str) -> Result<()> {
        self.bookings.release(seat, name)?;
        self.broadcast();
        Ok(())
    }

    /// Current full-state snapshot.
    pub fn snapshot(&self) -> Vec<SeatView> {
        self.table.snapshot()
    }

    // --- Introspection ---

    /// Number of live subscriptions.
    pub fn connection_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }

    /// Number of active sessions (connected or detached).
    pub fn session_count(&self) -> usize {
        self.sessions.session_count()
    }

    /// Whether a display name is currently claimed.
    pub fn name_taken(&self, name: &str) -> bool {
        self.sessions.contains(name)
    }

    /// Snapshot the mutated table and fan it out, outside any seat guard.
    fn broadcast(&self) {
        self.subscriptions.broadcast_snapshot(&self.table.snapshot());
    }
}
