//! compression/stream.rs
//! Continuous gzip transforms over a whole container.
//!
//! Frame boundaries live in the decompressed stream only. The writer feeds every
//! header and payload through one encoder, and the reader pulls from one decoder.

use std::io::{BufRead, Write};

use flate2::bufread::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::compression::types::{resolve_level, CompressionError};

/// Wrap a sink in a gzip encoder at `level` (0..=9).
pub fn gzip_sink<W: Write>(sink: W, level: u32) -> Result<GzEncoder<W>, CompressionError> {
    Ok(GzEncoder::new(sink, resolve_level(level)?))
}

/// Wrap a buffered source in a gzip decoder.
///
/// Concatenated gzip members are read as one stream, which is what
/// `cat a.pb.gz b.pb.gz` produces.
pub fn gzip_source<R: BufRead>(source: R) -> MultiGzDecoder<R> {
    MultiGzDecoder::new(source)
}
