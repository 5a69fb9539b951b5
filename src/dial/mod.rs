//! Dialers: the connection factory seam.
//!
//! A [`Dialer`] is a zero-argument operation that attempts to establish one
//! new connection. The pool calls it when no idle connection is available and
//! capacity remains; the error a dial reports is passed through opaquely,
//! never interpreted.
//!
//! - [`TcpDialer`]: resolve-then-connect TCP dialer
//! - [`dial_fn`]: adapt a plain async closure into a dialer

use crate::base::error::BoxError;
use crate::conn::PoolConn;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

pub mod tcp;

pub use tcp::TcpDialer;

/// Outcome of a single dial attempt.
pub type DialResult<C> = Result<C, BoxError>;

/// Establishes new connections on demand.
pub trait Dialer: Send + Sync + 'static {
    /// The connection handle this dialer produces.
    type Conn: PoolConn;

    /// Attempt to establish one new connection.
    fn dial(&self) -> BoxFuture<'static, DialResult<Self::Conn>>;
}

/// Adapt an async closure into a [`Dialer`].
///
/// ```rust,ignore
/// use netpool::dial::dial_fn;
/// use tokio::net::TcpStream;
///
/// let dialer = dial_fn(|| async {
///     TcpStream::connect("127.0.0.1:7777").await.map_err(Into::into)
/// });
/// ```
pub fn dial_fn<F, Fut, C>(f: F) -> DialFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DialResult<C>> + Send + 'static,
    C: PoolConn,
{
    DialFn { f }
}

/// A [`Dialer`] backed by a closure. Built with [`dial_fn`].
pub struct DialFn<F> {
    f: F,
}

impl<F> fmt::Debug for DialFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialFn").finish()
    }
}

impl<F, Fut, C> Dialer for DialFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = DialResult<C>> + Send + 'static,
    C: PoolConn,
{
    type Conn = C;

    fn dial(&self) -> BoxFuture<'static, DialResult<C>> {
        Box::pin((self.f)())
    }
}
