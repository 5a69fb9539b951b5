//! # netpool
//!
//! A bounded, fail-fast connection pool for async Rust.
//!
//! `netpool` amortizes expensive connection establishment (TCP handshakes,
//! authentication) across many short-lived operations while enforcing a hard
//! ceiling on the number of live connections to an endpoint. The pool manages
//! connection lifecycle only: it never reads or writes through the handles it
//! hands out.
//!
//! ## Features
//!
//! - **Bounded capacity**: idle + checked-out connections never exceed the
//!   configured maximum
//! - **Fail-fast acquisition**: no waiting on other callers; acquire reuses,
//!   dials, or reports exhaustion immediately
//! - **Pluggable transport**: any async dial closure or [`dial::Dialer`]
//!   implementation can supply connections
//! - **Safe teardown**: shutdown drains and closes every idle connection and
//!   permanently disables acquisition
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use netpool::dial::TcpDialer;
//! use netpool::pool::Pool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = Pool::new(5, 30, TcpDialer::new("127.0.0.1:7777"))
//!         .await
//!         .unwrap();
//!     let conn = pool.get().await.unwrap();
//!     // ... use the connection ...
//!     pool.put(conn);
//!     pool.close();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Core types and error definitions
//! - [`conn`] - Connection handle capability trait
//! - [`dial`] - Dialers, the connection factory seam
//! - [`pool`] - The bounded connection pool

pub mod base;
pub mod conn;
pub mod dial;
pub mod pool;
