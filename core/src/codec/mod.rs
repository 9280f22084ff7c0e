//! codec/mod.rs
//! Record codec: one `DeviceApps` record to/from a protobuf byte buffer.
//!
//! Responsibilities:
//! - Define the `Device` / `DeviceApps` schema
//! - Validate loosely-typed record descriptions (`serde_json::Value`)
//! - Encode and decode single payloads
//!
//! Non-responsibilities:
//! - Framing
//! - Compression
//! - IO

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{CodecError, Device, DeviceApps};
pub use encode::{encode_description, encode_record, Coordinate};
pub use decode::decode_record;
