use thiserror::Error;

/// Opaque transport error produced by a dial attempt.
///
/// The pool wraps whatever the dialer reports without interpreting it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by pool operations.
///
/// Every error is returned synchronously to the caller that triggered it;
/// the pool never retries or suppresses one internally.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Construction-time parameter validation failed. Not retryable.
    #[error("invalid pool capacity (initial {initial}, max {max})")]
    InvalidCapacity { initial: usize, max: usize },

    /// The dialer failed to establish a connection. Retryable at the
    /// caller's discretion.
    #[error("connection dial failed")]
    Factory(#[source] BoxError),

    /// Live connections are at the maximum and none are idle. The caller
    /// must back off and retry, or fail the request upstream.
    #[error("connection limit reached")]
    Exhausted,

    /// The pool has been shut down. Permanent.
    #[error("pool is closed")]
    Closed,
}

impl PoolError {
    /// Whether the condition can clear without caller-side changes.
    ///
    /// `Exhausted` clears when another caller releases; `Factory` depends on
    /// the remote end. `InvalidCapacity` and `Closed` never clear.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PoolError::Factory(_) | PoolError::Exhausted)
    }
}
