//! Deadline scheduler for lock expiry.

use crate::types::{ConnectionId, SeatId};
use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// A scheduled expiry: which acquisition of which seat should lapse.
///
/// `generation` pins the entry to one specific acquisition. The callback
/// re-validates against the live seat, so an entry whose generation has
/// been superseded is a guaranteed no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockExpiry {
    pub seat: SeatId,
    pub conn: ConnectionId,
    pub generation: u64,
}

#[derive(Debug, PartialEq, Eq)]
struct Entry {
    deadline: Instant,
    expiry: LockExpiry,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.expiry.seat.0.cmp(&other.expiry.seat.0))
            .then_with(|| self.expiry.conn.0.cmp(&other.expiry.conn.0))
            .then_with(|| self.expiry.generation.cmp(&other.expiry.generation))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Single worker thread that fires lock expiries at their deadlines.
///
/// New acquisitions arrive over a channel and wake the worker immediately,
/// so a short deadline scheduled behind a long one is still honored. The
/// worker holds no seat state: firing means invoking the callback, which
/// performs its own check-then-clear under the seat table's lock.
///
/// Dropping the scheduler closes the channel; the worker exits without
/// firing whatever is left in its queue (process teardown).
pub struct ExpiryScheduler {
    sender: Option<Sender<Entry>>,
    worker: Option<JoinHandle<()>>,
}

impl ExpiryScheduler {
    /// Start the worker thread with the given expiry callback.
    pub fn start(on_expiry: impl Fn(LockExpiry) + Send + 'static) -> Self {
        let (sender, receiver) = unbounded::<Entry>();

        let worker = thread::Builder::new()
            .name("lock-expiry".to_string())
            .spawn(move || {
                let mut queue: BinaryHeap<Reverse<Entry>> = BinaryHeap::new();

                loop {
                    // Fire everything that is due.
                    let now = Instant::now();
                    while queue
                        .peek()
                        .map_or(false, |Reverse(entry)| entry.deadline <= now)
                    {
                        let Reverse(entry) = queue.pop().expect("peeked entry");
                        on_expiry(entry.expiry);
                    }

                    // Sleep until the next deadline, or park until scheduled.
                    let next = queue
                        .peek()
                        .map(|Reverse(entry)| entry.deadline.saturating_duration_since(now));

                    match next {
                        Some(wait) => match receiver.recv_timeout(wait) {
                            Ok(entry) => queue.push(Reverse(entry)),
                            Err(RecvTimeoutError::Timeout) => {}
                            Err(RecvTimeoutError::Disconnected) => break,
                        },
                        None => match receiver.recv() {
                            Ok(entry) => queue.push(Reverse(entry)),
                            Err(_) => break,
                        },
                    }
                }
            })
            .expect("spawn lock-expiry thread");

        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Schedule one expiry to fire at `deadline`.
    pub fn schedule(&self, deadline: Instant, expiry: LockExpiry) {
        if let Some(sender) = &self.sender {
            // Send only fails after shutdown, when firing is moot anyway.
            let _ = sender.send(Entry { deadline, expiry });
        }
    }
}

impl Drop for ExpiryScheduler {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded as channel;
    use std::time::Duration;

    fn expiry(seat: u32, generation: u64) -> LockExpiry {
        LockExpiry {
            seat: SeatId(seat),
            conn: ConnectionId(1),
            generation,
        }
    }

    #[test]
    fn test_fires_at_deadline() {
        let (tx, rx) = channel();
        let scheduler = ExpiryScheduler::start(move |e| tx.send(e).unwrap());

        scheduler.schedule(Instant::now() + Duration::from_millis(20), expiry(1, 1));

        let fired = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(fired, expiry(1, 1));
    }

    #[test]
    fn test_earlier_deadline_preempts_later() {
        let (tx, rx) = channel();
        let scheduler = ExpiryScheduler::start(move |e| tx.send(e).unwrap());

        // Long deadline first; the short one must still fire first.
        scheduler.schedule(Instant::now() + Duration::from_secs(60), expiry(1, 1));
        scheduler.schedule(Instant::now() + Duration::from_millis(20), expiry(2, 1));

        let fired = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(fired.seat, SeatId(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let (tx, rx) = channel();
        let scheduler = ExpiryScheduler::start(move |e| tx.send(e).unwrap());

        let now = Instant::now();
        scheduler.schedule(now + Duration::from_millis(60), expiry(3, 1));
        scheduler.schedule(now + Duration::from_millis(20), expiry(1, 1));
        scheduler.schedule(now + Duration::from_millis(40), expiry(2, 1));

        let mut order = Vec::new();
        for _ in 0..3 {
            order.push(rx.recv_timeout(Duration::from_secs(1)).unwrap().seat);
        }
        assert_eq!(order, vec![SeatId(1), SeatId(2), SeatId(3)]);
    }

    #[test]
    fn test_shutdown_joins_worker() {
        let (tx, rx) = channel();
        let scheduler = ExpiryScheduler::start(move |e| tx.send(e).unwrap());

        scheduler.schedule(Instant::now() + Duration::from_secs(60), expiry(1, 1));
        drop(scheduler);

        // Pending entry is discarded on shutdown.
        assert!(rx.try_recv().is_err());
    }
}
