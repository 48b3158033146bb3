//! Analysis pipeline orchestration.
//!
//! Stages run strictly downward: capture reading, per-frame decoding in
//! original order, the sequential flow-tracking pass, then the statistics
//! reduction. Prediction consumes the outputs separately with a
//! caller-supplied pattern library. Each invocation starts from fresh
//! state; nothing survives between captures.

use serde::{Deserialize, Serialize};

mod flows;
mod pattern;
mod stats;

pub use flows::track_flows;
pub use pattern::{MIN_SIMILARITY, extract_pattern_signature, predict_issues};
pub use stats::aggregate_statistics;

use crate::capture::{CaptureError, read_capture};
use crate::decode::decode_frame;
use crate::{Packet, PacketStatistics};

/// Full analysis of one capture buffer: flagged packets, aggregate
/// statistics, and the container error that stopped decoding early, if
/// any. The error travels with the partial data instead of replacing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureReport {
    pub packets: Vec<Packet>,
    pub statistics: PacketStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CaptureError>,
}

/// Run the whole pipeline over a capture buffer.
///
/// Never fails: a bad magic yields an empty report carrying a format
/// error, and a truncated capture yields every packet decoded before the
/// truncation point plus the error.
///
/// # Examples
/// ```
/// use packetlens_core::analyze_capture;
///
/// let report = analyze_capture(&[]);
/// assert_eq!(report.statistics.total_packets, 0);
/// assert!(report.error.is_some());
/// ```
pub fn analyze_capture(data: &[u8]) -> CaptureReport {
    let capture = read_capture(data);
    let mut packets: Vec<Packet> = capture
        .frames
        .iter()
        .enumerate()
        .map(|(id, frame)| decode_frame(id as u64, frame))
        .collect();
    track_flows(&mut packets);
    let statistics = aggregate_statistics(&packets);
    CaptureReport {
        packets,
        statistics,
        error: capture.error,
    }
}
