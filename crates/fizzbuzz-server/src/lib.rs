//! fizzbuzz HTTP server library entry.
//!
//! Wires config, shared state, the fizzbuzz/metrics handlers and the ops
//! endpoints into an axum router, and owns the serve loop with its bounded
//! shutdown drain. Consumed by the binary (`main.rs`) and integration tests.

pub mod app_state;
pub mod config;
pub mod http;
pub mod ops;
pub mod router;
pub mod server;
