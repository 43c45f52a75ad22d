//! fizzbuzz core: transport-agnostic sequence generation, request shapes,
//! usage metrics and the shared error surface.
//!
//! Nothing in here knows about HTTP. The server crate maps these types onto
//! routes and status codes; tests and other frontends can use them directly.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A zero divisor or a poisoned lock surfaces as `FizzBuzzError` or is
//! recovered, never as a crashed request task.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod generator;
pub mod metrics;
pub mod shape;

/// Shared result type.
pub use error::{FizzBuzzError, Result};
pub use generator::generate;
pub use metrics::{HitEntry, InMemoryMetrics, MetricsStore};
pub use shape::RequestShape;
