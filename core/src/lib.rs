//! deviceapps-core
//!
//! Record codec and gzip-compressed container stream for `DeviceApps` records.
//! No Python, no PyO3, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

// Layers, bottom-up
pub mod codec;
pub mod headers;
pub mod compression;
pub mod telemetry;
pub mod container;

// Entry points
pub mod api;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::api::{read_all, read_records, write_records, ApiConfig};
    pub use crate::codec::{Device, DeviceApps};
    pub use crate::container::{ContainerReader, ContainerWriter, Records};
    pub use crate::types::{ErrorKind, StreamError};
}
