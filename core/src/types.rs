use std::fmt;
use std::io;

use thiserror::Error;

use crate::codec::CodecError;
use crate::compression::CompressionError;
use crate::headers::HeaderError;

/// Which part of a frame a short read hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSection {
    Header,
    Payload,
}

impl fmt::Display for FrameSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameSection::Header => write!(f, "header"),
            FrameSection::Payload => write!(f, "payload"),
        }
    }
}

/// Coarse error taxonomy surfaced to callers and bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong shape or type for a record or field.
    SchemaValidation,
    /// Encoded record exceeds the u16 length field.
    RecordTooLarge,
    /// Cannot open, create, read or write the underlying file.
    Io,
    /// Header or payload shorter than declared.
    TruncatedStream,
    /// Payload bytes do not parse as a record.
    Decoding,
    /// Frame header is not well-formed (bad magic).
    Format,
    /// Invalid `ApiConfig` value.
    Config,
}

/// Unified stream error covering I/O, framing, codec and compression.
/// - `From<T>` impls enable `?` across the layers.
/// - Errors are terminal for the current read/write; nothing is retried.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Record description failed validation; nothing was written for it.
    #[error("schema validation error: {0}")]
    Schema(#[source] CodecError),

    /// Payload could not be decoded.
    #[error("decoding error: {0}")]
    Decoding(#[source] CodecError),

    /// Stream ended inside a frame.
    #[error("truncated stream: {section} expected {expected} bytes, got {actual}")]
    Truncated {
        section: FrameSection,
        expected: usize,
        actual: usize,
    },

    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),
}

impl From<CodecError> for StreamError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Decode(_) => StreamError::Decoding(e),
            CodecError::NotARecord | CodecError::TypeMismatch(_) => StreamError::Schema(e),
        }
    }
}

impl StreamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::Io(_) => ErrorKind::Io,
            StreamError::Schema(_) => ErrorKind::SchemaValidation,
            StreamError::Decoding(_) => ErrorKind::Decoding,
            StreamError::Truncated { .. } => ErrorKind::TruncatedStream,
            StreamError::Header(HeaderError::PayloadTooLarge { .. }) => ErrorKind::RecordTooLarge,
            StreamError::Header(HeaderError::BufferTooShort { .. }) => ErrorKind::TruncatedStream,
            StreamError::Header(HeaderError::InvalidMagic { .. }) => ErrorKind::Format,
            StreamError::Compression(_) => ErrorKind::Config,
        }
    }
}
