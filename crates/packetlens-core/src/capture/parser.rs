//! Container parsing over an in-memory byte buffer.
//!
//! Both container variants are driven to the same contract: decode frames
//! in order until the buffer ends cleanly, or stop at the first record that
//! cannot be decoded and report how far decoding reached.

use pcap_parser::{Block, Linktype, parse_block_be, parse_block_le, parse_pcap_header};

use super::error::CaptureError;
use super::reader::{ContainerKind, detect_container, ng_ts_to_seconds, ts_units_per_second};
use super::{Frame, layout};

/// Frames decoded from a capture buffer, plus the error that stopped
/// decoding early, if any.
#[derive(Debug, Clone, Default)]
pub struct CaptureResult {
    pub frames: Vec<Frame>,
    pub error: Option<CaptureError>,
}

/// Decode a capture buffer into an ordered frame sequence.
///
/// The container variant and byte order are selected from the magic-number
/// prefix and applied to every subsequent integer field. A bad magic gives
/// zero frames and a format error; a truncated or malformed record stops
/// decoding and returns everything decoded up to that point.
///
/// # Examples
/// ```
/// use packetlens_core::{CaptureError, read_capture};
///
/// let result = read_capture(&[0xff, 0xfe, 0x00, 0x00]);
/// assert!(result.frames.is_empty());
/// assert!(matches!(result.error, Some(CaptureError::Format { .. })));
/// ```
pub fn read_capture(data: &[u8]) -> CaptureResult {
    match detect_container(data) {
        None => CaptureResult {
            frames: Vec::new(),
            error: Some(CaptureError::Format {
                magic: hex_prefix(data),
            }),
        },
        Some(ContainerKind::Legacy { big_endian, nanos }) => read_legacy(data, big_endian, nanos),
        Some(ContainerKind::Ng { big_endian }) => read_ng(data, big_endian),
    }
}

fn read_legacy(data: &[u8], big_endian: bool, nanos: bool) -> CaptureResult {
    let (mut rem, header) = match parse_pcap_header(data) {
        Ok(parsed) => parsed,
        Err(_) => {
            return truncated(Vec::new(), data, data, "capture header");
        }
    };
    let linktype = header.network;
    let subsec_scale = if nanos { 1e-9 } else { 1e-6 };

    let mut frames = Vec::new();
    while !rem.is_empty() {
        let parsed = if big_endian {
            pcap_parser::parse_pcap_frame_be(rem)
        } else {
            pcap_parser::parse_pcap_frame(rem)
        };
        match parsed {
            Ok((rest, record)) => {
                frames.push(Frame {
                    ts: record.ts_sec as f64 + record.ts_usec as f64 * subsec_scale,
                    captured_len: record.caplen,
                    original_len: record.origlen,
                    linktype,
                    data: record.data.to_vec(),
                });
                rem = rest;
            }
            Err(_) => return truncated(frames, data, rem, "record header"),
        }
    }
    CaptureResult {
        frames,
        error: None,
    }
}

fn read_ng(data: &[u8], big_endian: bool) -> CaptureResult {
    let mut big_endian = big_endian;
    let mut rem = data;
    let mut frames = Vec::new();
    // Per-interface link types and timestamp scales, in declaration order.
    let mut linktypes: Vec<Linktype> = Vec::new();
    let mut ts_units: Vec<f64> = Vec::new();

    while !rem.is_empty() {
        let parsed = if big_endian {
            parse_block_be(rem)
        } else {
            parse_block_le(rem)
        };
        let (rest, block) = match parsed {
            Ok(parsed) => parsed,
            Err(_) => return truncated(frames, data, rem, "block header"),
        };
        match block {
            Block::SectionHeader(shb) => {
                big_endian = shb.big_endian();
                linktypes.clear();
                ts_units.clear();
            }
            Block::InterfaceDescription(idb) => {
                linktypes.push(idb.linktype);
                ts_units.push(ts_units_per_second(idb.if_tsresol));
            }
            Block::EnhancedPacket(epb) => {
                let if_id = epb.if_id as usize;
                let units = ts_units
                    .get(if_id)
                    .copied()
                    .unwrap_or(10f64.powi(layout::NG_DEFAULT_TSRESOL as i32));
                let linktype = linktypes
                    .get(if_id)
                    .copied()
                    .unwrap_or(Linktype::ETHERNET);
                // The block data may carry alignment padding past caplen.
                let captured = epb.data.len().min(epb.caplen as usize);
                frames.push(Frame {
                    ts: ng_ts_to_seconds(epb.ts_high, epb.ts_low, units),
                    captured_len: epb.caplen,
                    original_len: epb.origlen,
                    linktype,
                    data: epb.data[..captured].to_vec(),
                });
            }
            _ => {}
        }
        rem = rest;
    }
    CaptureResult {
        frames,
        error: None,
    }
}

fn truncated(frames: Vec<Frame>, data: &[u8], rem: &[u8], what: &str) -> CaptureResult {
    let offset = data.len() - rem.len();
    let error = CaptureError::Truncated {
        offset,
        frames_decoded: frames.len(),
        message: format!("{what} could not be decoded"),
    };
    CaptureResult {
        frames,
        error: Some(error),
    }
}

fn hex_prefix(data: &[u8]) -> String {
    data.iter()
        .take(layout::MAGIC_LEN)
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{CaptureError, read_capture};
    use crate::capture::layout;

    fn legacy_header(magic: [u8; 4]) -> Vec<u8> {
        let mut header = Vec::new();
        header.extend_from_slice(&magic);
        header.extend_from_slice(&2u16.to_le_bytes());
        header.extend_from_slice(&4u16.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes());
        header.extend_from_slice(&65535u32.to_le_bytes());
        header.extend_from_slice(&1u32.to_le_bytes());
        header
    }

    fn legacy_record(ts_sec: u32, ts_usec: u32, payload: &[u8]) -> Vec<u8> {
        let mut record = Vec::new();
        record.extend_from_slice(&ts_sec.to_le_bytes());
        record.extend_from_slice(&ts_usec.to_le_bytes());
        record.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        record.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        record.extend_from_slice(payload);
        record
    }

    #[test]
    fn unrecognized_magic_is_a_format_error() {
        let result = read_capture(&[0xde, 0xad, 0xbe, 0xef, 0x00]);
        assert!(result.frames.is_empty());
        match result.error {
            Some(CaptureError::Format { magic }) => assert_eq!(magic, "deadbeef"),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn empty_buffer_is_a_format_error() {
        let result = read_capture(&[]);
        assert!(result.frames.is_empty());
        assert!(matches!(result.error, Some(CaptureError::Format { .. })));
    }

    #[test]
    fn header_only_capture_yields_zero_frames_and_no_error() {
        let data = legacy_header(layout::LEGACY_MAGIC_LE);
        let result = read_capture(&data);
        assert!(result.frames.is_empty());
        assert!(result.error.is_none());
    }

    #[test]
    fn legacy_records_decode_in_order_with_timestamps() {
        let mut data = legacy_header(layout::LEGACY_MAGIC_LE);
        data.extend_from_slice(&legacy_record(10, 500_000, b"abc"));
        data.extend_from_slice(&legacy_record(11, 0, b"defgh"));

        let result = read_capture(&data);
        assert!(result.error.is_none());
        assert_eq!(result.frames.len(), 2);
        assert!((result.frames[0].ts - 10.5).abs() < 1e-9);
        assert_eq!(result.frames[0].data, b"abc");
        assert_eq!(result.frames[1].captured_len, 5);
        assert_eq!(result.frames[1].original_len, 5);
    }

    #[test]
    fn truncated_second_record_keeps_first_frame() {
        let mut data = legacy_header(layout::LEGACY_MAGIC_LE);
        data.extend_from_slice(&legacy_record(1, 0, b"abcd"));
        let first_record_end = data.len();
        // Second record claims 100 captured bytes but the buffer ends early.
        let mut bad = Vec::new();
        bad.extend_from_slice(&2u32.to_le_bytes());
        bad.extend_from_slice(&0u32.to_le_bytes());
        bad.extend_from_slice(&100u32.to_le_bytes());
        bad.extend_from_slice(&100u32.to_le_bytes());
        bad.extend_from_slice(b"short");
        data.extend_from_slice(&bad);

        let result = read_capture(&data);
        assert_eq!(result.frames.len(), 1);
        match result.error {
            Some(CaptureError::Truncated {
                offset,
                frames_decoded,
                ..
            }) => {
                assert_eq!(offset, first_record_end);
                assert_eq!(frames_decoded, 1);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn truncated_global_header_reports_offset_zero() {
        let data = &layout::LEGACY_MAGIC_LE[..];
        let mut short = data.to_vec();
        short.extend_from_slice(&[0u8; 4]);

        let result = read_capture(&short);
        assert!(result.frames.is_empty());
        assert!(matches!(
            result.error,
            Some(CaptureError::Truncated { offset: 0, .. })
        ));
    }

    fn ng_block_be(block_type: u32, body: &[u8]) -> Vec<u8> {
        let padded = body.len().div_ceil(4) * 4;
        let total_len = (12 + padded) as u32;
        let mut block = Vec::new();
        block.extend_from_slice(&block_type.to_be_bytes());
        block.extend_from_slice(&total_len.to_be_bytes());
        block.extend_from_slice(body);
        block.resize(8 + padded, 0);
        block.extend_from_slice(&total_len.to_be_bytes());
        block
    }

    #[test]
    fn big_endian_section_decodes_blocks() {
        let mut shb = Vec::new();
        shb.extend_from_slice(&layout::NG_BOM_BE);
        shb.extend_from_slice(&1u16.to_be_bytes());
        shb.extend_from_slice(&0u16.to_be_bytes());
        shb.extend_from_slice(&u64::MAX.to_be_bytes());

        let mut idb = Vec::new();
        idb.extend_from_slice(&1u16.to_be_bytes()); // ethernet
        idb.extend_from_slice(&0u16.to_be_bytes());
        idb.extend_from_slice(&65535u32.to_be_bytes());

        let mut epb = Vec::new();
        epb.extend_from_slice(&0u32.to_be_bytes());
        epb.extend_from_slice(&0u32.to_be_bytes());
        epb.extend_from_slice(&3_000_000u32.to_be_bytes());
        epb.extend_from_slice(&3u32.to_be_bytes());
        epb.extend_from_slice(&3u32.to_be_bytes());
        epb.extend_from_slice(b"xyz");

        let mut data = ng_block_be(0x0a0d0d0a, &shb);
        data.extend_from_slice(&ng_block_be(0x0000_0001, &idb));
        data.extend_from_slice(&ng_block_be(0x0000_0006, &epb));

        let result = read_capture(&data);
        assert!(result.error.is_none());
        assert_eq!(result.frames.len(), 1);
        assert_eq!(result.frames[0].data, b"xyz");
        assert_eq!(result.frames[0].captured_len, 3);
        assert!((result.frames[0].ts - 3.0).abs() < 1e-9);
    }

    #[test]
    fn nanosecond_magic_scales_subseconds() {
        let mut data = legacy_header(layout::LEGACY_NSEC_MAGIC_LE);
        data.extend_from_slice(&legacy_record(1, 500_000_000, b"x"));

        let result = read_capture(&data);
        assert!(result.error.is_none());
        assert!((result.frames[0].ts - 1.5).abs() < 1e-9);
    }
}
