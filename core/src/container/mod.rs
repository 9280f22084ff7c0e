//! Container stream: frames of `header || payload` inside one gzip stream.
//!
//! ```text
//! container := frame*
//! frame     := header payload
//! header    := magic:u32le type:u16le length:u16le   -- 8 bytes
//! payload   := <length> bytes of protobuf DeviceApps
//! ```

pub mod reader;
pub mod writer;

pub use reader::{ContainerReader, RawFrame, Records};
pub use writer::ContainerWriter;
