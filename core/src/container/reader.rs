//! container/reader.rs
//! Frame reader over a gzip-compressed container.
//!
//! State machine per frame:
//! 1. read up to 8 header bytes; 0 bytes is a clean end, 1..7 is truncation
//! 2. check magic (unless disabled)
//! 3. read or skip exactly `length` payload bytes; a short read is truncation
//!
//! `Records` layers the type filter and codec on top and stops for good after the
//! first error.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::bufread::MultiGzDecoder;
use log::{debug, info, warn};

use crate::api::ApiConfig;
use crate::codec::{decode_record, DeviceApps};
use crate::compression::gzip_source;
use crate::headers::{decode_header_le, FrameHeader, FrameType};
use crate::telemetry::ReadCounters;
use crate::types::{FrameSection, StreamError};

// Scratch size for discarding payloads of unknown frame types.
const SKIP_CHUNK: usize = 4096;

/// One frame as found in the stream, payload undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub header: FrameHeader,
    pub payload: Vec<u8>,
}

pub struct ContainerReader<R: Read> {
    source: MultiGzDecoder<BufReader<R>>,
    verify_magic: bool,
    counters: ReadCounters,
}

impl ContainerReader<File> {
    pub fn open<P: AsRef<Path>>(path: P, config: &ApiConfig) -> Result<Self, StreamError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        info!("opened container for reading: {}", path.display());
        Ok(Self::new(file, config))
    }
}

impl<R: Read> ContainerReader<R> {
    pub fn new(source: R, config: &ApiConfig) -> Self {
        let buffered = BufReader::with_capacity(config.resolved_buffer_capacity(), source);
        Self {
            source: gzip_source(buffered),
            verify_magic: config.magic_check_enabled(),
            counters: ReadCounters::default(),
        }
    }

    pub fn counters(&self) -> &ReadCounters {
        &self.counters
    }

    /// Fill `buf` as far as the stream allows. Returns the byte count.
    ///
    /// A gzip stream cut short shows up as `UnexpectedEof` from the decoder;
    /// that is reported as truncation of `section` too.
    fn fill(&mut self, buf: &mut [u8], section: FrameSection) -> Result<usize, StreamError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(StreamError::Truncated { section, expected: buf.len(), actual: filled });
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// Next frame header, `None` at a clean end of stream.
    pub fn next_header(&mut self) -> Result<Option<FrameHeader>, StreamError> {
        let mut buf = [0u8; FrameHeader::LEN];
        let got = self.fill(&mut buf, FrameSection::Header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < FrameHeader::LEN {
            return Err(StreamError::Truncated {
                section: FrameSection::Header,
                expected: FrameHeader::LEN,
                actual: got,
            });
        }

        let header = decode_header_le(&buf)?;
        if self.verify_magic {
            header.validate()?;
        }
        Ok(Some(header))
    }

    /// Read exactly the payload announced by `header`.
    pub fn read_payload(&mut self, header: &FrameHeader) -> Result<Vec<u8>, StreamError> {
        let mut payload = vec![0u8; header.payload_len()];
        let got = self.fill(&mut payload, FrameSection::Payload)?;
        if got < payload.len() {
            return Err(StreamError::Truncated {
                section: FrameSection::Payload,
                expected: payload.len(),
                actual: got,
            });
        }
        Ok(payload)
    }

    /// Consume the payload announced by `header` without keeping it.
    pub fn skip_payload(&mut self, header: &FrameHeader) -> Result<(), StreamError> {
        let expected = header.payload_len();
        let mut scratch = [0u8; SKIP_CHUNK];
        let mut skipped = 0;

        while skipped < expected {
            let want = (expected - skipped).min(SKIP_CHUNK);
            let got = match self.fill(&mut scratch[..want], FrameSection::Payload) {
                Ok(n) => n,
                Err(StreamError::Truncated { actual, .. }) => {
                    let actual = skipped + actual;
                    return Err(StreamError::Truncated { section: FrameSection::Payload, expected, actual });
                }
                Err(e) => return Err(e),
            };
            skipped += got;
            if got < want {
                return Err(StreamError::Truncated { section: FrameSection::Payload, expected, actual: skipped });
            }
        }
        Ok(())
    }

    /// Next frame of any type, payload undecoded. Does not touch the counters.
    pub fn next_frame(&mut self) -> Result<Option<RawFrame>, StreamError> {
        let Some(header) = self.next_header()? else {
            return Ok(None);
        };
        let payload = self.read_payload(&header)?;
        Ok(Some(RawFrame { header, payload }))
    }

    /// Next `DeviceApps` record, skipping frames with other type tags.
    pub fn next_record(&mut self) -> Result<Option<DeviceApps>, StreamError> {
        while let Some(header) = self.next_header()? {
            match header.frame_type_enum() {
                Some(FrameType::DeviceApps) => {
                    let payload = self.read_payload(&header)?;
                    let record = decode_record(&payload).map_err(StreamError::Decoding)?;
                    self.counters.add_decoded(FrameHeader::LEN, payload.len());
                    debug!("frame decoded: payload={}B", payload.len());
                    return Ok(Some(record));
                }
                None => {
                    self.skip_payload(&header)?;
                    self.counters.add_skipped(FrameHeader::LEN, header.payload_len());
                    warn!(
                        "skipped frame with unknown type {} ({} payload bytes)",
                        header.frame_type,
                        header.payload_len()
                    );
                }
            }
        }
        info!(
            "container exhausted: {} records, {} skipped frames",
            self.counters.frames_decoded, self.counters.frames_skipped
        );
        Ok(None)
    }

    /// Lazy iterator over the remaining records.
    pub fn records(self) -> Records<R> {
        Records { reader: self, done: false }
    }
}

/// Lazy record sequence. Pulls one frame per `next()`; fused after the end of
/// the stream or the first error.
pub struct Records<R: Read> {
    reader: ContainerReader<R>,
    done: bool,
}

impl<R: Read> Records<R> {
    pub fn counters(&self) -> &ReadCounters {
        self.reader.counters()
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<DeviceApps, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.reader.next_record().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}

impl<R: Read> std::iter::FusedIterator for Records<R> {}
