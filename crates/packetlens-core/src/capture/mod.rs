//! Capture-container reading.
//!
//! This module decodes a raw capture byte buffer into an ordered sequence
//! of frames. It supports the legacy fixed-record format and the
//! block-structured format, selecting the variant and the byte order from
//! the magic-number prefix. A truncated buffer yields the frames decoded
//! before the truncation point plus an error, never an all-or-nothing
//! failure.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::CaptureError;
pub use parser::{CaptureResult, read_capture};

use pcap_parser::Linktype;

/// One raw captured frame, immutable once produced by the reader.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Capture timestamp in fractional seconds.
    pub ts: f64,
    /// Number of bytes actually captured.
    pub captured_len: u32,
    /// Original frame length on the wire.
    pub original_len: u32,
    /// Link layer of the capturing interface.
    pub linktype: Linktype,
    /// Captured bytes (`captured_len` of them).
    pub data: Vec<u8>,
}
