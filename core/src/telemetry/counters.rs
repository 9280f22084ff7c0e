//! telemetry/counters.rs
//! Mutable counters collected while writing or reading a container.
//!
//! All byte counts are logical: bytes fed to the compressor (or pulled out of
//! the decompressor), never the compressed size on disk.

use serde::Serialize;

/// Counters accumulated by `ContainerWriter`.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WriteCounters {
    pub frames_written: u64,
    pub bytes_header: u64,
    pub bytes_payload: u64,
}

impl WriteCounters {
    /// Record one frame that reached the compressor.
    pub fn add_frame(&mut self, header_len: usize, payload_len: usize) {
        self.frames_written += 1;
        self.bytes_header += header_len as u64;
        self.bytes_payload += payload_len as u64;
    }

    /// Header + payload bytes written so far.
    pub fn bytes_logical(&self) -> u64 {
        self.bytes_header + self.bytes_payload
    }
}

/// Counters accumulated by `ContainerReader`.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReadCounters {
    pub frames_decoded: u64,
    pub frames_skipped: u64,
    pub bytes_header: u64,
    pub bytes_payload: u64,
}

impl ReadCounters {
    pub fn add_decoded(&mut self, header_len: usize, payload_len: usize) {
        self.frames_decoded += 1;
        self.bytes_header += header_len as u64;
        self.bytes_payload += payload_len as u64;
    }

    /// Frames with an unknown type tag; payload consumed but not decoded.
    pub fn add_skipped(&mut self, header_len: usize, payload_len: usize) {
        self.frames_skipped += 1;
        self.bytes_header += header_len as u64;
        self.bytes_payload += payload_len as u64;
    }

    pub fn frames_total(&self) -> u64 {
        self.frames_decoded + self.frames_skipped
    }

    pub fn bytes_logical(&self) -> u64 {
        self.bytes_header + self.bytes_payload
    }
}
