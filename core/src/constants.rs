//! constants.rs
//! Wire constants for the container format and defaults for `ApiConfig`.

/// Sentinel written at the start of every frame header.
pub const MAGIC: u32 = 0xFFFF_FFFF;

/// Type tag identifying a `DeviceApps` payload.
pub const DEVICE_APPS_TYPE: u16 = 1;

/// Fixed frame header size in bytes (magic + type + length).
pub const HEADER_LEN: usize = 8;

/// Largest payload a frame can carry; the length field is a u16.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Defaults when `Option<T>` is None
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
pub const MAX_COMPRESSION_LEVEL: u32 = 9;
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024; // 64 KiB
