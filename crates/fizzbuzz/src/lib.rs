//! Top-level facade crate for fizzbuzz.
//!
//! Re-exports the core types and the server library so users can depend on a single crate.

pub mod core {
    pub use fizzbuzz_core::*;
}

pub mod server {
    pub use fizzbuzz_server::*;
}
