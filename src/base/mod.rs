//! Base types and error handling.
//!
//! Provides foundational types shared across the crate:
//! - [`error::PoolError`]: the pool's error taxonomy
//! - [`error::BoxError`]: the opaque transport error at the dial seam

pub mod error;
