//! codec/types.rs
//! `DeviceApps` protobuf schema and codec errors.
//!
//! The messages are declared with `prost` derive attributes rather than generated
//! from a `.proto` file, so no `protoc` is needed at build time. Equivalent schema:
//!
//! ```text
//! message DeviceApps {
//!   message Device {
//!     optional bytes id = 1;
//!     optional bytes type = 2;
//!   }
//!   optional Device device = 1;
//!   repeated uint32 apps = 2;
//!   optional double lat = 3;
//!   optional double lon = 4;
//! }
//! ```
//!
//! `id` and `type` are typed as strings here. The wire type is the same as
//! `bytes`; decoding only adds a UTF-8 check.

use thiserror::Error;

/// Device identity. Each field is independently optional.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Device {
    #[prost(string, optional, tag = "1")]
    pub id: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub r#type: Option<String>,
}

/// One record of the container.
///
/// `apps` has no presence flag: an empty list and a missing list encode the
/// same way and both decode as empty.
#[derive(Clone, PartialEq, prost::Message)]
pub struct DeviceApps {
    #[prost(message, optional, tag = "1")]
    pub device: Option<Device>,
    #[prost(uint32, repeated, packed = "false", tag = "2")]
    pub apps: Vec<u32>,
    #[prost(double, optional, tag = "3")]
    pub lat: Option<f64>,
    #[prost(double, optional, tag = "4")]
    pub lon: Option<f64>,
}

#[derive(Debug, Error)]
pub enum CodecError {
    /// The item is not a record-shaped structure at all.
    #[error("record description should be a dictionary")]
    NotARecord,

    /// A known field holds a value of the wrong type.
    #[error("type mismatch: {0}")]
    TypeMismatch(&'static str),

    /// Payload bytes are not a valid `DeviceApps` message.
    #[error("payload decode failed: {0}")]
    Decode(#[from] prost::DecodeError),
}
