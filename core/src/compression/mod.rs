//! compression/mod.rs
//! Stream compression for the container (gzip via flate2).
//!
//! The compressor is a black-box transform with flush/finalize semantics:
//! `GzEncoder::finish` writes the trailer, `MultiGzDecoder` reverses it.

pub mod types;
pub mod stream;

pub use types::*;
pub use stream::*;
