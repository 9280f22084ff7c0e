//! compression/types.rs
//! Compression level handling and errors.

use flate2::Compression;
use thiserror::Error;

use crate::constants::MAX_COMPRESSION_LEVEL;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("invalid gzip level: {have} > {max}")]
    InvalidLevel { have: u32, max: u32 },
}

/// Map a configured level onto `flate2::Compression`, rejecting values above 9.
pub fn resolve_level(level: u32) -> Result<Compression, CompressionError> {
    match level {
        0..=MAX_COMPRESSION_LEVEL => Ok(Compression::new(level)),
        _ => Err(CompressionError::InvalidLevel { have: level, max: MAX_COMPRESSION_LEVEL }),
    }
}
