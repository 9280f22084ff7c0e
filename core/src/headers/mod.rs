//! headers/mod.rs
//! Frame header of the container stream.
//!
//! Notes:
//! - Fixed-size header (8 bytes) lets the reader find record boundaries in the
//!   decompressed stream without any lookahead.
//! - The type tag allows several record kinds to share one stream; readers skip
//!   tags they do not know by length.
//! - The length field bounds a payload to 65535 bytes.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;

// ## Implementation notes

// - Endianness: little-endian for every multi-byte field. The format was born on
//   x86 hosts writing the header struct verbatim, so this keeps old files readable.
// - Magic is a sanity marker only; `FrameHeader::validate` checks it and the reader
//   calls it unless `ApiConfig::verify_magic` is switched off.
