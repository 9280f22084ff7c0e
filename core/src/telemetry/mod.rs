//! telemetry/mod.rs
//! Frame and byte counters for container reads and writes.
//!
//! Counters are plain data (`Serialize`) so callers can log or export them as JSON.

pub mod counters;

pub use counters::*;
