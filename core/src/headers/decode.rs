//! headers/decode.rs
//!
//! Header decoding utilities.
//!
//! Design notes:
//! - Deserializes a fixed 8-byte buffer into a `FrameHeader`.
//! - Does not check the magic; callers decide via `FrameHeader::validate`.

use byteorder::{ByteOrder, LittleEndian};

use crate::headers::types::{FrameHeader, HeaderError};

/// Deserialize an 8-byte little-endian header.
///
/// Extra trailing bytes are ignored, so a full frame can be passed in.
#[inline]
pub fn decode_header_le(buf: &[u8]) -> Result<FrameHeader, HeaderError> {
    if buf.len() < FrameHeader::LEN {
        return Err(HeaderError::BufferTooShort { have: buf.len(), need: FrameHeader::LEN });
    }

    Ok(FrameHeader {
        magic: LittleEndian::read_u32(&buf[0..4]),
        frame_type: LittleEndian::read_u16(&buf[4..6]),
        length: LittleEndian::read_u16(&buf[6..8]),
    })
}
