//! Stable public API: whole-file write and read.
//!
//! Each call owns its file handle for its whole duration. Release happens on
//! scope exit (see `ContainerWriter`'s `Drop`), so every error path closes the file.

use std::borrow::Borrow;
use std::fs::File;
use std::path::Path;

use log::info;
use serde_json::Value;

use crate::codec::DeviceApps;
use crate::constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_COMPRESSION_LEVEL};
use crate::container::{ContainerReader, ContainerWriter, Records};
use crate::types::StreamError;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// gzip level 0..=9.
    /// - `None` → `DEFAULT_COMPRESSION_LEVEL` (6).
    pub compression_level: Option<u32>,

    /// Reject frames whose magic is not 0xFFFFFFFF.
    /// - `None` or `Some(true)` → checked (default).
    /// - `Some(false)` → trusted, as older readers did.
    pub verify_magic: Option<bool>,

    /// `BufReader` / `BufWriter` capacity around the file.
    /// - `None` → `DEFAULT_BUFFER_CAPACITY` (64 KiB).
    pub buffer_capacity: Option<usize>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            compression_level: Some(DEFAULT_COMPRESSION_LEVEL),
            verify_magic: Some(true),
            buffer_capacity: Some(DEFAULT_BUFFER_CAPACITY),
        }
    }
}

impl ApiConfig {
    pub fn new(
        compression_level: Option<u32>,
        verify_magic: Option<bool>,
        buffer_capacity: Option<usize>,
    ) -> Self {
        Self {
            compression_level: compression_level.or(Some(DEFAULT_COMPRESSION_LEVEL)),
            verify_magic: verify_magic.or(Some(true)),
            buffer_capacity: buffer_capacity.or(Some(DEFAULT_BUFFER_CAPACITY)),
        }
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = Some(level);
        self
    }

    pub fn without_magic_check(mut self) -> Self {
        self.verify_magic = Some(false);
        self
    }

    pub fn resolved_level(&self) -> u32 {
        self.compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL)
    }

    pub fn magic_check_enabled(&self) -> bool {
        self.verify_magic.unwrap_or(true)
    }

    pub fn resolved_buffer_capacity(&self) -> usize {
        match self.buffer_capacity {
            Some(cap) if cap > 0 => cap,
            _ => DEFAULT_BUFFER_CAPACITY,
        }
    }
}

/// Write every record description to a new container at `path`.
///
/// Returns the logical byte count (headers + payloads before compression).
/// Stops at the first invalid record; frames already written stay in the file,
/// which is still closed with a valid gzip trailer.
pub fn write_records<I, P>(records: I, path: P, config: &ApiConfig) -> Result<u64, StreamError>
where
    I: IntoIterator,
    I::Item: Borrow<Value>,
    P: AsRef<Path>,
{
    let mut writer = ContainerWriter::create(path.as_ref(), config)?;
    let total = writer.write_all(records)?;
    let (_, counters) = writer.finish()?;
    info!("wrote {} records ({} logical bytes)", counters.frames_written, total);
    Ok(total)
}

/// Open a container for lazy, record-by-record reading.
pub fn read_records<P: AsRef<Path>>(path: P, config: &ApiConfig) -> Result<Records<File>, StreamError> {
    Ok(ContainerReader::open(path, config)?.records())
}

/// Read a whole container into memory. Fails on the first bad frame.
pub fn read_all<P: AsRef<Path>>(path: P, config: &ApiConfig) -> Result<Vec<DeviceApps>, StreamError> {
    read_records(path, config)?.collect()
}
