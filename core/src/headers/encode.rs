//! headers/encode.rs
//!
//! Header encoding utilities.
//!
//! Design notes:
//! - Serializes `FrameHeader` into a fixed 8-byte buffer in little-endian order.
//! - Field order must match `decode.rs` exactly.

use std::io::{self, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::headers::types::FrameHeader;

/// Serialize a `FrameHeader` into an 8-byte buffer in little-endian order.
#[inline]
pub fn encode_header_le(h: &FrameHeader) -> [u8; FrameHeader::LEN] {
    let mut out = [0u8; FrameHeader::LEN];

    LittleEndian::write_u32(&mut out[0..4], h.magic);      // 0..4 magic
    LittleEndian::write_u16(&mut out[4..6], h.frame_type); // 4..6 type tag
    LittleEndian::write_u16(&mut out[6..8], h.length);     // 6..8 payload length

    out
}

/// Write a header straight into a sink.
pub fn write_header<W: Write>(w: &mut W, h: &FrameHeader) -> io::Result<()> {
    w.write_u32::<LittleEndian>(h.magic)?;
    w.write_u16::<LittleEndian>(h.frame_type)?;
    w.write_u16::<LittleEndian>(h.length)?;
    Ok(())
}
