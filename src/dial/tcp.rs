use crate::dial::{DialResult, Dialer};
use futures::future::BoxFuture;
use std::io;
use tokio::net::TcpStream;

/// Dials TCP connections to a fixed `host:port` endpoint.
///
/// Resolution runs on every dial, so address changes are picked up without
/// rebuilding the pool. Resolved addresses are tried in order and the first
/// successful connection wins.
#[derive(Debug, Clone)]
pub struct TcpDialer {
    addr: String,
}

impl TcpDialer {
    /// Create a dialer for `addr` in `host:port` form.
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// The endpoint this dialer connects to.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Dialer for TcpDialer {
    type Conn = TcpStream;

    fn dial(&self) -> BoxFuture<'static, DialResult<TcpStream>> {
        let addr = self.addr.clone();
        Box::pin(async move {
            tracing::debug!(addr = %addr, "dialing");
            let candidates = tokio::net::lookup_host(&addr).await?;

            let mut last_err = None;
            for candidate in candidates {
                match TcpStream::connect(candidate).await {
                    Ok(stream) => {
                        tracing::debug!(addr = %addr, peer = %candidate, "connected");
                        return Ok(stream);
                    }
                    Err(e) => last_err = Some(e),
                }
            }

            let err = last_err
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses resolved"));
            tracing::debug!(addr = %addr, error = %err, "dial failed");
            Err(err.into())
        })
    }
}
