//! headers/types.rs
//! Frame header struct and the type-tag registry.

use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::constants::{DEVICE_APPS_TYPE, HEADER_LEN, MAGIC, MAX_PAYLOAD_LEN};

/// Known frame type tags.
///
/// Anything outside this registry is still a well-formed frame; the reader
/// skips its payload instead of failing.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum FrameType {
    DeviceApps = 1,
}

impl FrameType {
    /// Resolve a raw tag, `None` for tags this build does not understand.
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::try_from_primitive(raw).ok()
    }
}

/// Canonical frame header (fixed size).
///
/// All fields are little-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub magic: u32,       // always MAGIC when written by us
    pub frame_type: u16,  // raw tag, may be unknown
    pub length: u16,      // payload bytes following the header
}

impl FrameHeader {
    pub const LEN: usize = 4 // magic
        + 2                  // frame_type
        + 2;                 // length

    /// Build a header for a payload of `payload_len` bytes.
    ///
    /// Fails with `PayloadTooLarge` instead of truncating the length field.
    pub fn new(frame_type: u16, payload_len: usize) -> Result<Self, HeaderError> {
        let length = u16::try_from(payload_len).map_err(|_| HeaderError::PayloadTooLarge {
            have: payload_len,
            max: MAX_PAYLOAD_LEN,
        })?;
        Ok(Self { magic: MAGIC, frame_type, length })
    }

    /// Header for a `DeviceApps` payload.
    pub fn for_device_apps(payload_len: usize) -> Result<Self, HeaderError> {
        Self::new(FrameType::DeviceApps as u16, payload_len)
    }

    pub fn frame_type_enum(&self) -> Option<FrameType> {
        FrameType::from_raw(self.frame_type)
    }

    pub fn payload_len(&self) -> usize {
        self.length as usize
    }

    /// Total logical size of the frame (header + payload).
    pub fn frame_len(&self) -> usize {
        Self::LEN + self.payload_len()
    }

    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.magic != MAGIC {
            return Err(HeaderError::InvalidMagic { have: self.magic });
        }
        Ok(())
    }
}

const _: () = assert!(FrameHeader::LEN == HEADER_LEN);
const _: () = assert!(FrameType::DeviceApps as u16 == DEVICE_APPS_TYPE);

/// Render a magic value the way it appears on the wire.
pub fn fmt_magic(magic: &u32) -> String {
    format!("0x{}", hex::encode(magic.to_le_bytes()))
}

#[derive(Debug, Error)]
pub enum HeaderError {
    /// Buffer too short to contain a header.
    #[error("header buffer too short: {have} < {need}")]
    BufferTooShort { have: usize, need: usize },

    /// Magic marker is not 0xFFFFFFFF.
    #[error("invalid magic: expected {}, got {}", fmt_magic(&MAGIC), fmt_magic(.have))]
    InvalidMagic { have: u32 },

    /// Encoded record does not fit the u16 length field.
    #[error("payload too large: {have} > {max}")]
    PayloadTooLarge { have: usize, max: usize },
}
