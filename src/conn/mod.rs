//! Connection handle abstraction.
//!
//! The pool treats connections as opaque resources: it stores them, hands
//! them out, and closes them, but never reads or writes through them.
//! [`PoolConn`] is the capability a handle must offer to be poolable.

/// An opaque connection handle the pool can manage.
///
/// The only capability the pool requires is teardown. For most transports
/// dropping the value already releases the underlying resource, so `close`
/// defaults to `drop`; implementors whose handles need an explicit shutdown
/// sequence override it.
pub trait PoolConn: Send + 'static {
    /// Tear down the underlying transport.
    fn close(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}

// Closing a stream is dropping it; the kernel tears the socket down.
impl PoolConn for tokio::net::TcpStream {}

#[cfg(unix)]
impl PoolConn for tokio::net::UnixStream {}

impl<T: PoolConn> PoolConn for Box<T> {
    fn close(self) {
        (*self).close();
    }
}
