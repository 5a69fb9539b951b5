//! Connection pooling.
//!
//! [`Pool`] shares a bounded set of reusable connections between concurrent
//! callers. Acquisition is fail-fast: a call either reuses an idle
//! connection, dials a new one within capacity, or reports exhaustion. It
//! never waits for another caller to release.

use crate::base::error::PoolError;
use crate::conn::PoolConn;
use crate::dial::Dialer;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A bounded pool of reusable connections to one endpoint.
///
/// Cloning is cheap and every clone operates on the same pool, so a `Pool`
/// can be handed to as many tasks as needed. At most `max_capacity`
/// connections exist at once, counting both idle ones and those checked out
/// to callers. The pool only manages lifecycle; it never reads or writes
/// through a connection.
pub struct Pool<D: Dialer> {
    inner: Arc<PoolInner<D>>,
}

struct PoolInner<D: Dialer> {
    max_capacity: usize,
    state: Mutex<PoolState<D>>,
}

/// Everything that must be observed consistently lives under one lock:
/// the closed flag, the live counter, and the idle queue. No await point
/// is ever reached while the guard is held.
struct PoolState<D: Dialer> {
    idle: VecDeque<D::Conn>,
    live: usize,
    dialer: Option<Arc<D>>,
    closed: bool,
}

impl<D: Dialer> Clone for Pool<D> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<D: Dialer> fmt::Debug for Pool<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state();
        f.debug_struct("Pool")
            .field("max_capacity", &self.inner.max_capacity)
            .field("idle", &state.idle.len())
            .field("live", &state.live)
            .field("closed", &state.closed)
            .finish()
    }
}

impl<D: Dialer> PoolInner<D> {
    fn state(&self) -> MutexGuard<'_, PoolState<D>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: Dialer> Pool<D> {
    /// Create a pool and warm it with `initial_capacity` connections.
    ///
    /// Fails with [`PoolError::InvalidCapacity`] when `max_capacity` is zero
    /// or `initial_capacity` exceeds it. If any warm-up dial fails, every
    /// connection created so far is closed and construction fails with
    /// [`PoolError::Factory`]; a half-initialized pool is never returned.
    pub async fn new(
        initial_capacity: usize,
        max_capacity: usize,
        dialer: D,
    ) -> Result<Self, PoolError> {
        if max_capacity == 0 || initial_capacity > max_capacity {
            return Err(PoolError::InvalidCapacity {
                initial: initial_capacity,
                max: max_capacity,
            });
        }

        let dialer = Arc::new(dialer);
        let mut idle = VecDeque::with_capacity(max_capacity);
        for _ in 0..initial_capacity {
            match dialer.dial().await {
                Ok(conn) => idle.push_back(conn),
                Err(e) => {
                    for conn in idle {
                        conn.close();
                    }
                    return Err(PoolError::Factory(e));
                }
            }
        }

        tracing::debug!(
            initial = initial_capacity,
            max = max_capacity,
            "connection pool ready"
        );
        Ok(Self {
            inner: Arc::new(PoolInner {
                max_capacity,
                state: Mutex::new(PoolState {
                    idle,
                    live: initial_capacity,
                    dialer: Some(dialer),
                    closed: false,
                }),
            }),
        })
    }

    /// Acquire a connection for exclusive use.
    ///
    /// Reuses an idle connection when one is available, dials a new one when
    /// the live count is under `max_capacity`, and otherwise fails with
    /// [`PoolError::Exhausted`] without waiting. Ownership of the returned
    /// handle transfers to the caller until it comes back through [`put`].
    ///
    /// [`put`]: Pool::put
    pub async fn get(&self) -> Result<D::Conn, PoolError> {
        let dialer = {
            let mut state = self.inner.state();
            if state.closed {
                return Err(PoolError::Closed);
            }
            if let Some(conn) = state.idle.pop_front() {
                tracing::trace!(idle = state.idle.len(), "reusing idle connection");
                return Ok(conn);
            }
            if state.live >= self.inner.max_capacity {
                return Err(PoolError::Exhausted);
            }
            let dialer = match state.dialer.as_ref() {
                Some(dialer) => Arc::clone(dialer),
                None => return Err(PoolError::Closed),
            };
            // Reserve the slot before dialing; a failed dial hands it back.
            // Concurrent callers can then never push live past the ceiling.
            state.live += 1;
            dialer
        };

        match dialer.dial().await {
            Ok(conn) => {
                tracing::debug!("dialed new pooled connection");
                Ok(conn)
            }
            Err(e) => {
                // Return the reserved slot.
                let mut state = self.inner.state();
                state.live = state.live.saturating_sub(1);
                Err(PoolError::Factory(e))
            }
        }
    }

    /// Return a previously acquired connection for reuse.
    ///
    /// Release cannot fail: a handle cannot be absent by construction, and a
    /// connection released into a closed pool is simply closed and dropped,
    /// untracked. With the idle queue sized at `max_capacity` every tracked
    /// connection can always be requeued; a full queue therefore means the
    /// handle was a stray, and it is closed rather than stored.
    pub fn put(&self, conn: D::Conn) {
        let discarded = {
            let mut state = self.inner.state();
            if state.closed {
                Some(conn)
            } else if state.idle.len() < self.inner.max_capacity {
                state.idle.push_back(conn);
                tracing::trace!(idle = state.idle.len(), "connection returned to pool");
                None
            } else {
                state.live = state.live.saturating_sub(1);
                Some(conn)
            }
        };

        if let Some(conn) = discarded {
            tracing::debug!("discarding connection released to a full or closed pool");
            conn.close();
        }
    }

    /// Number of idle connections available for immediate acquisition.
    ///
    /// The value is a consistent snapshot but may be stale by the time it is
    /// read; concurrent acquire/release traffic moves it at any moment.
    pub fn idle_count(&self) -> usize {
        self.inner.state().idle.len()
    }

    /// Whether no idle connection is currently available.
    pub fn is_empty(&self) -> bool {
        self.inner.state().idle.is_empty()
    }

    /// Number of live connections, idle and checked out combined.
    pub fn live_count(&self) -> usize {
        self.inner.state().live
    }

    /// The ceiling on simultaneous live connections.
    pub fn max_capacity(&self) -> usize {
        self.inner.max_capacity
    }

    /// Whether the pool has been shut down.
    pub fn is_closed(&self) -> bool {
        self.inner.state().closed
    }

    /// Shut the pool down, closing every idle connection.
    ///
    /// Idempotent: the closed guard makes later calls no-ops. Connections
    /// currently checked out are left with their holders; releasing one
    /// afterwards disposes of it per [`put`]. Every subsequent [`get`] fails
    /// with [`PoolError::Closed`].
    ///
    /// [`get`]: Pool::get
    /// [`put`]: Pool::put
    pub fn close(&self) {
        let drained = {
            let mut state = self.inner.state();
            if state.closed {
                return;
            }
            state.closed = true;
            state.dialer = None;
            state.live = 0;
            std::mem::take(&mut state.idle)
        };

        let count = drained.len();
        for conn in drained {
            conn.close();
        }
        tracing::debug!(drained = count, "connection pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::error::BoxError;
    use crate::dial::dial_fn;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FakeConn {
        closes: Arc<AtomicUsize>,
    }

    impl PoolConn for FakeConn {
        fn close(self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fake_dialer() -> (impl Dialer<Conn = FakeConn>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let dials = Arc::new(AtomicUsize::new(0));
        let closes = Arc::new(AtomicUsize::new(0));
        let d = dials.clone();
        let c = closes.clone();
        let dialer = dial_fn(move || {
            let d = d.clone();
            let c = c.clone();
            async move {
                d.fetch_add(1, Ordering::SeqCst);
                Ok(FakeConn { closes: c })
            }
        });
        (dialer, dials, closes)
    }

    #[tokio::test]
    async fn test_zero_max_capacity_rejected() {
        let (dialer, dials, _) = fake_dialer();
        let err = Pool::new(0, 0, dialer).await.unwrap_err();
        assert!(matches!(err, PoolError::InvalidCapacity { initial: 0, max: 0 }));
        assert_eq!(dials.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_initial_above_max_rejected() {
        let (dialer, dials, _) = fake_dialer();
        let err = Pool::new(8, 4, dialer).await.unwrap_err();
        assert!(matches!(err, PoolError::InvalidCapacity { initial: 8, max: 4 }));
        assert_eq!(dials.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_construction_failure_closes_partial_state() {
        let dials = Arc::new(AtomicUsize::new(0));
        let closes = Arc::new(AtomicUsize::new(0));
        let d = dials.clone();
        let c = closes.clone();
        let dialer = dial_fn(move || {
            let d = d.clone();
            let c = c.clone();
            async move {
                if d.fetch_add(1, Ordering::SeqCst) == 2 {
                    Err(BoxError::from("injected dial failure"))
                } else {
                    Ok(FakeConn { closes: c })
                }
            }
        });

        let err = Pool::new(5, 10, dialer).await.unwrap_err();
        assert!(matches!(err, PoolError::Factory(_)));
        // Both connections created before the failed dial were torn down.
        assert_eq!(closes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_close_drains_and_closes_idle() {
        let (dialer, _, closes) = fake_dialer();
        let pool = Pool::new(3, 8, dialer).await.unwrap();
        assert_eq!(pool.idle_count(), 3);

        pool.close();
        assert!(pool.is_closed());
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(pool.live_count(), 0);
        assert_eq!(closes.load(Ordering::SeqCst), 3);

        // Second close finds the guard set and does nothing.
        pool.close();
        assert_eq!(closes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_get_after_close_fails() {
        let (dialer, _, _) = fake_dialer();
        let pool = Pool::new(1, 2, dialer).await.unwrap();
        pool.close();
        assert!(matches!(pool.get().await.unwrap_err(), PoolError::Closed));
    }

    #[tokio::test]
    async fn test_put_into_closed_pool_disposes() {
        let (dialer, _, closes) = fake_dialer();
        let pool = Pool::new(1, 2, dialer).await.unwrap();
        let conn = pool.get().await.unwrap();

        pool.close();
        // The checked-out connection stays with its holder.
        assert_eq!(closes.load(Ordering::SeqCst), 0);

        pool.put(conn);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert_eq!(pool.idle_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_dial_returns_capacity_slot() {
        let flaky = Arc::new(AtomicBool::new(true));
        let closes = Arc::new(AtomicUsize::new(0));
        let fail = flaky.clone();
        let c = closes.clone();
        let dialer = dial_fn(move || {
            let fail = fail.clone();
            let c = c.clone();
            async move {
                if fail.load(Ordering::SeqCst) {
                    Err(BoxError::from("injected dial failure"))
                } else {
                    Ok(FakeConn { closes: c })
                }
            }
        });

        let pool = Pool::new(0, 1, dialer).await.unwrap();
        assert!(matches!(pool.get().await.unwrap_err(), PoolError::Factory(_)));
        assert_eq!(pool.live_count(), 0);

        // The failed dial did not consume the only slot.
        flaky.store(false, Ordering::SeqCst);
        let conn = pool.get().await.unwrap();
        assert_eq!(pool.live_count(), 1);
        pool.put(conn);
    }

    #[tokio::test]
    async fn test_exhaustion_is_fail_fast() {
        let (dialer, dials, _) = fake_dialer();
        let pool = Pool::new(0, 2, dialer).await.unwrap();

        let a = pool.get().await.unwrap();
        let b = pool.get().await.unwrap();
        assert!(matches!(pool.get().await.unwrap_err(), PoolError::Exhausted));

        pool.put(a);
        let reused = pool.get().await.unwrap();
        // Reacquisition after a release reuses; no third dial happened.
        assert_eq!(dials.load(Ordering::SeqCst), 2);
        pool.put(reused);
        pool.put(b);
    }

    #[tokio::test]
    async fn test_put_into_full_idle_queue_discards() {
        let (dialer, _, closes) = fake_dialer();
        let pool = Pool::new(2, 2, dialer).await.unwrap();

        // A handle this pool never tracked, arriving while every slot of the
        // idle queue is occupied.
        let stray = FakeConn { closes: closes.clone() };
        pool.put(stray);

        assert_eq!(pool.idle_count(), 2);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
