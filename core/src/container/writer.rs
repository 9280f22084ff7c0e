//! container/writer.rs
//! Framed, gzip-compressed record writer.
//!
//! Every frame is `header || payload`, pushed through one continuous gzip
//! encoder. The encoder is finalized exactly once: by `finish`, or by `Drop`
//! when the writer goes out of scope early (validation or I/O error).

use std::borrow::Borrow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use log::{debug, info, warn};
use serde_json::Value;

use crate::api::ApiConfig;
use crate::codec::{encode_record, DeviceApps};
use crate::compression::gzip_sink;
use crate::headers::{write_header, FrameHeader, FrameType};
use crate::telemetry::WriteCounters;
use crate::types::StreamError;

pub struct ContainerWriter<W: Write> {
    // `None` only after `finish` or `Drop` consumed it.
    encoder: Option<GzEncoder<W>>,
    counters: WriteCounters,
}

impl ContainerWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and start a new container.
    pub fn create<P: AsRef<Path>>(path: P, config: &ApiConfig) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        info!("opened container for writing: {}", path.display());
        Self::new(BufWriter::with_capacity(config.resolved_buffer_capacity(), file), config)
    }
}

impl<W: Write> ContainerWriter<W> {
    pub fn new(sink: W, config: &ApiConfig) -> Result<Self, StreamError> {
        let encoder = gzip_sink(sink, config.resolved_level())?;
        Ok(Self { encoder: Some(encoder), counters: WriteCounters::default() })
    }

    fn encoder_mut(&mut self) -> Result<&mut GzEncoder<W>, StreamError> {
        self.encoder
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "container writer already finished").into())
    }

    /// Write one raw frame with an arbitrary type tag.
    ///
    /// The length is checked before anything reaches the sink, so an oversize
    /// payload leaves the stream untouched.
    pub fn write_frame(&mut self, frame_type: u16, payload: &[u8]) -> Result<usize, StreamError> {
        let header = FrameHeader::new(frame_type, payload.len())?;

        let encoder = self.encoder_mut()?;
        write_header(encoder, &header)?;
        encoder.write_all(payload)?;

        self.counters.add_frame(FrameHeader::LEN, payload.len());
        debug!(
            "frame #{} written: type={} payload={}B",
            self.counters.frames_written,
            frame_type,
            payload.len()
        );
        Ok(header.frame_len())
    }

    /// Encode and write one record. Returns the logical frame size.
    pub fn write_record(&mut self, record: &DeviceApps) -> Result<usize, StreamError> {
        let payload = encode_record(record);
        self.write_frame(FrameType::DeviceApps as u16, &payload)
    }

    /// Validate a record description, then write it.
    ///
    /// A description that fails validation writes zero bytes.
    pub fn write_description(&mut self, description: &Value) -> Result<usize, StreamError> {
        let record = DeviceApps::from_description(description)?;
        self.write_record(&record)
    }

    /// Write every description from `records`, stopping at the first error.
    ///
    /// Returns the running logical total of this writer. Frames written before
    /// a failure stay in the stream.
    pub fn write_all<I>(&mut self, records: I) -> Result<u64, StreamError>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        for description in records {
            self.write_description(description.borrow())?;
        }
        Ok(self.counters.bytes_logical())
    }

    pub fn counters(&self) -> &WriteCounters {
        &self.counters
    }

    /// Logical bytes (headers + payloads) fed to the compressor so far.
    pub fn bytes_written(&self) -> u64 {
        self.counters.bytes_logical()
    }

    /// Finalize the gzip stream, flush, and hand back the sink.
    pub fn finish(mut self) -> Result<(W, WriteCounters), StreamError> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "container writer already finished"))?;
        let mut sink = encoder.finish()?;
        sink.flush()?;

        let counters = std::mem::take(&mut self.counters);
        info!(
            "container finished: {} frames, {} logical bytes",
            counters.frames_written,
            counters.bytes_logical()
        );
        Ok((sink, counters))
    }
}

impl<W: Write> Drop for ContainerWriter<W> {
    fn drop(&mut self) {
        let Some(encoder) = self.encoder.take() else {
            return;
        };
        warn!(
            "container writer dropped before finish; finalizing after {} frames",
            self.counters.frames_written
        );
        match encoder.finish() {
            Ok(mut sink) => {
                if let Err(e) = sink.flush() {
                    warn!("flush on drop failed: {}", e);
                }
            }
            Err(e) => warn!("gzip finalize on drop failed: {}", e),
        }
    }
}
