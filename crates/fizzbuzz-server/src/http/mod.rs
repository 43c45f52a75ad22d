//! HTTP surface for the fizzbuzz API.
//!
//! `params` turns raw query pairs into a validated `RequestShape`,
//! `handlers` runs the generator and metrics store, and `respond` owns the
//! JSON envelope plus the error -> status mapping.

pub mod handlers;
pub mod params;
pub mod respond;
