// Container stream suite (in-memory sinks and sources):
// * write path: framing, logical byte totals, size bound, guaranteed finalization
// * read path: clean end, truncation, bad magic, type filtering, fail-fast decode
// * gzip: continuous stream, concatenated members, level validation

#[cfg(test)]
mod tests {
    use std::io::Write;

    use deviceapps_core::api::ApiConfig;
    use deviceapps_core::codec::{encode_record, Device, DeviceApps};
    use deviceapps_core::constants::MAX_PAYLOAD_LEN;
    use deviceapps_core::container::{ContainerReader, ContainerWriter};
    use deviceapps_core::headers::{encode_header_le, FrameHeader, HeaderError};
    use deviceapps_core::types::{ErrorKind, FrameSection, StreamError};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::json;

    fn sample(n: u32) -> DeviceApps {
        DeviceApps {
            device: Some(Device { id: Some(format!("device-{n}")), r#type: Some("idfa".into()) }),
            apps: vec![n, n + 1, n + 2],
            lat: Some(55.75 + n as f64),
            lon: Some(37.61),
        }
    }

    /// Gzip raw bytes, bypassing the writer, to craft damaged streams.
    fn gzip(raw: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(raw).unwrap();
        enc.finish().unwrap()
    }

    fn write_container(records: &[DeviceApps], config: &ApiConfig) -> Vec<u8> {
        let mut writer = ContainerWriter::new(Vec::new(), config).unwrap();
        for r in records {
            writer.write_record(r).unwrap();
        }
        writer.finish().unwrap().0
    }

    fn read_container(bytes: &[u8], config: &ApiConfig) -> Vec<Result<DeviceApps, StreamError>> {
        ContainerReader::new(bytes, config).records().collect()
    }

// ## 1️⃣ Write → read

    #[test]
    fn records_come_back_in_order() {
        let cfg = ApiConfig::default();
        let input: Vec<_> = (0..10).map(sample).collect();
        let bytes = write_container(&input, &cfg);

        let output: Vec<_> = read_container(&bytes, &cfg).into_iter().map(Result::unwrap).collect();
        assert_eq!(output, input);
    }

    #[test]
    fn empty_container_yields_nothing() {
        let cfg = ApiConfig::default();
        let bytes = write_container(&[], &cfg);
        assert!(!bytes.is_empty(), "gzip header and trailer are still written");
        assert!(read_container(&bytes, &cfg).is_empty());
    }

    #[test]
    fn write_record_returns_logical_frame_size() {
        let cfg = ApiConfig::default();
        let rec = sample(1);
        let payload_len = encode_record(&rec).len();

        let mut writer = ContainerWriter::new(Vec::new(), &cfg).unwrap();
        assert_eq!(writer.write_record(&rec).unwrap(), FrameHeader::LEN + payload_len);
        assert_eq!(writer.bytes_written(), (FrameHeader::LEN + payload_len) as u64);
    }

    #[test]
    fn write_all_sums_headers_and_payloads() {
        let cfg = ApiConfig::default();
        let descriptions = vec![
            json!({"apps": [1, 2, 3]}),
            json!({"device": {"id": "abc", "type": "idfa"}, "lat": 1.0}),
        ];
        let expected: u64 = descriptions
            .iter()
            .map(|d| (8 + encode_record(&DeviceApps::from_description(d).unwrap()).len()) as u64)
            .sum();

        let mut writer = ContainerWriter::new(Vec::new(), &cfg).unwrap();
        let total = writer.write_all(&descriptions).unwrap();
        assert_eq!(total, expected);

        let (_, counters) = writer.finish().unwrap();
        assert_eq!(counters.frames_written, 2);
        assert_eq!(counters.bytes_header, 16);
        assert_eq!(counters.bytes_logical(), expected);
    }

    #[test]
    fn logical_total_is_not_compressed_size() {
        let cfg = ApiConfig::default();
        let records: Vec<_> = (0..200).map(|_| sample(7)).collect();
        let mut writer = ContainerWriter::new(Vec::new(), &cfg).unwrap();
        for r in &records {
            writer.write_record(r).unwrap();
        }
        let logical = writer.bytes_written();
        let (compressed, _) = writer.finish().unwrap();
        assert!((compressed.len() as u64) < logical);
    }

    #[test]
    fn write_all_stops_at_first_invalid_record() {
        let cfg = ApiConfig::default();
        let mut buf = Vec::new();
        {
            let mut writer = ContainerWriter::new(&mut buf, &cfg).unwrap();
            let descriptions = vec![
                json!({"apps": [1]}),
                json!({"device": {"id": 42}}),
                json!({"apps": [3]}),
            ];
            let err = writer.write_all(&descriptions).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::SchemaValidation);
            assert_eq!(writer.counters().frames_written, 1);
            // writer dropped here without finish()
        }

        let output: Vec<_> = read_container(&buf, &cfg).into_iter().map(Result::unwrap).collect();
        assert_eq!(output, vec![DeviceApps { apps: vec![1], ..Default::default() }]);
    }

    #[test]
    fn non_record_item_is_a_distinct_error() {
        let cfg = ApiConfig::default();
        let mut writer = ContainerWriter::new(Vec::new(), &cfg).unwrap();
        let err = writer.write_description(&json!(["not", "a", "dict"])).unwrap_err();
        assert!(matches!(err, StreamError::Schema(deviceapps_core::codec::CodecError::NotARecord)));
        assert_eq!(writer.bytes_written(), 0);
    }

// ## ❌ 2️⃣ Size bound

    #[test]
    fn oversize_record_is_rejected_before_writing() {
        let cfg = ApiConfig::default();
        let huge = DeviceApps {
            device: Some(Device { id: Some("x".repeat(MAX_PAYLOAD_LEN)), r#type: None }),
            ..Default::default()
        };

        let mut writer = ContainerWriter::new(Vec::new(), &cfg).unwrap();
        writer.write_record(&sample(1)).unwrap();
        let before = writer.bytes_written();

        let err = writer.write_record(&huge).unwrap_err();
        assert!(matches!(err, StreamError::Header(HeaderError::PayloadTooLarge { .. })));
        assert_eq!(err.kind(), ErrorKind::RecordTooLarge);
        assert_eq!(writer.bytes_written(), before);

        let (bytes, _) = writer.finish().unwrap();
        let output: Vec<_> = read_container(&bytes, &cfg).into_iter().map(Result::unwrap).collect();
        assert_eq!(output, vec![sample(1)]);
    }

// ## 3️⃣ Multiplexed streams

    #[test]
    fn unknown_frame_types_are_skipped() {
        let cfg = ApiConfig::default();
        let mut writer = ContainerWriter::new(Vec::new(), &cfg).unwrap();
        writer.write_frame(99, b"\xff\xff\xff not protobuf at all").unwrap();
        writer.write_record(&sample(1)).unwrap();
        writer.write_frame(0, &[]).unwrap();
        let (bytes, _) = writer.finish().unwrap();

        let mut records = ContainerReader::new(bytes.as_slice(), &cfg).records();
        assert_eq!(records.next().unwrap().unwrap(), sample(1));
        assert!(records.next().is_none());

        let counters = records.counters();
        assert_eq!(counters.frames_decoded, 1);
        assert_eq!(counters.frames_skipped, 2);
        assert_eq!(counters.frames_total(), 3);
    }

    #[test]
    fn next_frame_exposes_every_frame() {
        let cfg = ApiConfig::default();
        let mut writer = ContainerWriter::new(Vec::new(), &cfg).unwrap();
        writer.write_frame(5, b"abc").unwrap();
        writer.write_record(&sample(2)).unwrap();
        let (bytes, _) = writer.finish().unwrap();

        let mut reader = ContainerReader::new(bytes.as_slice(), &cfg);
        let first = reader.next_frame().unwrap().unwrap();
        assert_eq!(first.header.frame_type, 5);
        assert_eq!(first.payload, b"abc");

        let second = reader.next_frame().unwrap().unwrap();
        assert_eq!(second.header.frame_type, 1);
        assert_eq!(second.payload, encode_record(&sample(2)));

        assert!(reader.next_frame().unwrap().is_none());
    }

// ## ❌ 4️⃣ Damaged streams

    #[test]
    fn truncated_payload_is_reported() {
        let cfg = ApiConfig::default();
        let mut raw = encode_header_le(&FrameHeader::for_device_apps(10).unwrap()).to_vec();
        raw.extend_from_slice(&[0x10, 0x01, 0x10, 0x02, 0x10]);

        let results = read_container(&gzip(&raw), &cfg);
        assert_eq!(results.len(), 1, "iterator must stop after the error");
        match &results[0] {
            Err(StreamError::Truncated { section: FrameSection::Payload, expected: 10, actual: 5 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn partial_header_is_reported() {
        let cfg = ApiConfig::default();
        let mut raw = write_raw_frame(1, &encode_record(&sample(1)));
        raw.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0x01]);

        let results = read_container(&gzip(&raw), &cfg);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), &sample(1));
        match &results[1] {
            Err(StreamError::Truncated { section: FrameSection::Header, expected: 8, actual: 5 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn cut_compressed_file_is_truncation() {
        let cfg = ApiConfig::default().with_compression_level(0);
        let rec = DeviceApps {
            device: Some(Device { id: Some("a".repeat(200)), r#type: None }),
            ..Default::default()
        };
        let bytes = write_container(&[rec], &cfg);
        let cut = &bytes[..bytes.len() - 20];

        let results = read_container(cut, &cfg);
        let last = results.last().expect("at least one result");
        match last {
            Err(e) => assert_eq!(e.kind(), ErrorKind::TruncatedStream, "got {:?}", e),
            Ok(_) => panic!("cut stream must not end cleanly"),
        }
    }

    #[test]
    fn bad_magic_is_rejected_by_default() {
        let cfg = ApiConfig::default();
        let mut raw = write_raw_frame(1, &encode_record(&sample(3)));
        raw[0..4].copy_from_slice(&[0, 0, 0, 0]);

        let results = read_container(&gzip(&raw), &cfg);
        assert_eq!(results.len(), 1);
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, StreamError::Header(HeaderError::InvalidMagic { have: 0 })));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn bad_magic_is_tolerated_when_check_disabled() {
        let cfg = ApiConfig::default().without_magic_check();
        let mut raw = write_raw_frame(1, &encode_record(&sample(3)));
        raw[0..4].copy_from_slice(&[0, 0, 0, 0]);

        let output: Vec<_> = read_container(&gzip(&raw), &cfg).into_iter().map(Result::unwrap).collect();
        assert_eq!(output, vec![sample(3)]);
    }

    #[test]
    fn undecodable_payload_fails_fast() {
        let cfg = ApiConfig::default();
        let mut raw = write_raw_frame(1, &[0xFF, 0xFF, 0xFF]);
        raw.extend(write_raw_frame(1, &encode_record(&sample(4))));

        let results = read_container(&gzip(&raw), &cfg);
        assert_eq!(results.len(), 1, "later frames must not be read");
        let err = results[0].as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
    }

    #[test]
    fn truncated_skipped_frame_reports_bytes_seen() {
        let cfg = ApiConfig::default();
        let mut raw = write_raw_frame(1, &encode_record(&sample(1)));
        raw.extend(encode_header_le(&FrameHeader::new(77, 5000).unwrap()));
        raw.extend(vec![0xAB; 4100]);

        let results = read_container(&gzip(&raw), &cfg);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), &sample(1));
        match &results[1] {
            Err(StreamError::Truncated { section: FrameSection::Payload, expected: 5000, actual: 4100 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn non_finite_coordinates_roundtrip() {
        let cfg = ApiConfig::default();
        let rec = DeviceApps { lat: Some(f64::NAN), lon: Some(f64::NEG_INFINITY), apps: vec![1], ..Default::default() };
        let bytes = write_container(&[rec], &cfg);

        let out = read_container(&bytes, &cfg).pop().unwrap().unwrap();
        assert!(out.lat.unwrap().is_nan());
        assert_eq!(out.lon, Some(f64::NEG_INFINITY));
        assert_eq!(out.apps, vec![1]);
    }

    fn write_raw_frame(frame_type: u16, payload: &[u8]) -> Vec<u8> {
        let mut raw = encode_header_le(&FrameHeader::new(frame_type, payload.len()).unwrap()).to_vec();
        raw.extend_from_slice(payload);
        raw
    }

// ## 5️⃣ gzip behaviour

    #[test]
    fn concatenated_containers_read_as_one() {
        let cfg = ApiConfig::default();
        let mut bytes = write_container(&[sample(1)], &cfg);
        bytes.extend(write_container(&[sample(2), sample(3)], &cfg));

        let output: Vec<_> = read_container(&bytes, &cfg).into_iter().map(Result::unwrap).collect();
        assert_eq!(output, vec![sample(1), sample(2), sample(3)]);
    }

    #[test]
    fn every_valid_level_roundtrips() {
        for level in 0..=9 {
            let cfg = ApiConfig::default().with_compression_level(level);
            let bytes = write_container(&[sample(level)], &cfg);
            let output: Vec<_> = read_container(&bytes, &cfg).into_iter().map(Result::unwrap).collect();
            assert_eq!(output, vec![sample(level)]);
        }
    }

    #[test]
    fn invalid_level_is_a_config_error() {
        let cfg = ApiConfig::default().with_compression_level(10);
        match ContainerWriter::new(Vec::new(), &cfg) {
            Err(e) => assert_eq!(e.kind(), ErrorKind::Config),
            Ok(_) => panic!("level 10 must be rejected"),
        }
    }

    #[test]
    fn dropped_writer_still_produces_valid_gzip() {
        let cfg = ApiConfig::default();
        let mut buf = Vec::new();
        {
            let mut writer = ContainerWriter::new(&mut buf, &cfg).unwrap();
            writer.write_record(&sample(8)).unwrap();
        }

        let output: Vec<_> = read_container(&buf, &cfg).into_iter().map(Result::unwrap).collect();
        assert_eq!(output, vec![sample(8)]);
    }

    #[test]
    fn counters_serialize_to_json() {
        let cfg = ApiConfig::default();
        let mut writer = ContainerWriter::new(Vec::new(), &cfg).unwrap();
        writer.write_record(&DeviceApps { apps: vec![1, 2, 3], ..Default::default() }).unwrap();
        let (_, counters) = writer.finish().unwrap();

        assert_eq!(
            serde_json::to_value(&counters).unwrap(),
            json!({"frames_written": 1, "bytes_header": 8, "bytes_payload": 6})
        );
    }
}
