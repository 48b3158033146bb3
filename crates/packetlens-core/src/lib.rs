//! PacketLens core library for offline capture analysis.
//!
//! This crate implements the analysis pipeline used by the presentation and
//! summarization layers: a capture reader decodes the binary container into
//! raw frames, a stateless layer decoder turns each frame into a structured
//! packet, a sequential flow tracker flags transport anomalies, and reducers
//! derive aggregate statistics and a similarity-based risk prediction.
//! Parsing is byte-oriented and side-effect free; the pipeline performs no
//! I/O and holds no state beyond a single invocation.
//!
//! Invariants:
//! - Packet identity is the 0-based index in capture order and is never
//!   reused.
//! - Anomaly flags are a pure function of the ordered packet sequence.
//! - Container errors are carried in the result next to the partial data
//!   that was decoded before the error, never thrown past the pipeline.
//!
//! # Examples
//! ```
//! use packetlens_core::analyze_capture;
//!
//! // An unrecognized magic number yields an empty report with an error.
//! let report = analyze_capture(&[0x00, 0x01, 0x02, 0x03]);
//! assert!(report.packets.is_empty());
//! assert!(report.error.is_some());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod analysis;
mod capture;
mod decode;
mod protocols;

pub use analysis::{CaptureReport, aggregate_statistics, analyze_capture, track_flows};
pub use analysis::{MIN_SIMILARITY, extract_pattern_signature, predict_issues};
pub use capture::{CaptureError, CaptureResult, Frame, read_capture};
pub use decode::decode_frame;

/// Number of conversation pairs reported as top talkers.
pub const TOP_TALKERS: usize = 10;

/// One decoded packet, identified by its index in capture order.
///
/// All fields except `flags` are immutable once produced by the layer
/// decoder; the flow tracker mutates only `flags`.
///
/// # Examples
/// ```
/// use packetlens_core::Packet;
///
/// let packet = Packet::empty(0, 1.5);
/// assert_eq!(packet.id, 0);
/// assert!(!packet.flags.has_error);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Packet {
    /// 0-based index in the decoded sequence.
    pub id: u64,
    /// Capture timestamp in fractional seconds.
    pub timestamp: f64,
    /// Display label of the highest decoded layer.
    pub protocol_label: String,
    /// Source address (IP, or MAC for non-IP frames).
    pub source: String,
    /// Destination address (IP, or MAC for non-IP frames).
    pub destination: String,
    /// Original (on the wire) length in bytes.
    pub length: u64,
    /// One-line human summary of the highest decoded layer.
    pub info_summary: String,
    /// Anomaly flags, set by the layer decoder and flow tracker only.
    pub flags: PacketFlags,
    /// Decoded protocol layers; at most one application layer is populated.
    pub layers: Layers,
}

impl Packet {
    /// Build a packet with no decoded layers and all flags cleared.
    pub fn empty(id: u64, timestamp: f64) -> Self {
        Self {
            id,
            timestamp,
            protocol_label: "Raw".to_string(),
            source: String::new(),
            destination: String::new(),
            length: 0,
            info_summary: String::new(),
            flags: PacketFlags::default(),
            layers: Layers::default(),
        }
    }
}

/// Per-packet anomaly flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketFlags {
    /// A lower-layer header was structurally impossible, or the flow was
    /// reset under this packet.
    pub has_error: bool,
    /// Payload range was already covered by this flow direction.
    pub is_retransmission: bool,
    /// Repeated acknowledgment number without new data.
    pub is_duplicate_ack: bool,
    /// Frame was snapped (captured length below original length).
    pub has_warning: bool,
}

/// Decoded layer stack of one packet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<TcpLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp: Option<UdpLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsLayer>,
}

/// Network-layer header fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpLayer {
    /// IP version (4 or 6).
    pub version: u8,
    /// Time to live (hop limit for IPv6).
    pub ttl: u8,
    /// IP protocol number (6 = TCP, 17 = UDP).
    pub protocol: u8,
}

/// TCP header fields plus the captured payload bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpLayer {
    pub source_port: u16,
    pub dest_port: u16,
    pub sequence_number: u32,
    pub acknowledgment_number: u32,
    pub flags: TcpFlags,
    pub window_size: u16,
    pub payload_bytes: Vec<u8>,
}

/// TCP control flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TcpFlags {
    pub syn: bool,
    pub ack: bool,
    pub fin: bool,
    pub rst: bool,
    pub psh: bool,
    pub urg: bool,
}

/// UDP header fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UdpLayer {
    pub source_port: u16,
    pub dest_port: u16,
    /// UDP length field (header plus payload).
    pub length: u16,
}

/// Decoded HTTP request or response head.
///
/// Headers keep insertion order and original key casing; a duplicate key
/// overwrites the earlier value in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpLayer {
    pub is_request: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Decoded DNS message summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsLayer {
    pub transaction_id: u16,
    pub is_query: bool,
    /// Question names, in message order.
    pub queries: Vec<String>,
    /// Rendered answer records, in message order.
    pub answers: Vec<String>,
}

/// TLS record metadata (unencrypted handshake level only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsLayer {
    /// Record protocol version label (e.g. "TLS 1.2").
    pub version: String,
    /// Handshake message type, when the record is a handshake.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handshake_type: Option<String>,
    /// Server Name Indication from a ClientHello, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
}

/// Aggregate statistics over one flagged packet sequence.
///
/// Recomputed fresh per capture, never mutated in place.
///
/// # Examples
/// ```
/// use packetlens_core::aggregate_statistics;
///
/// let stats = aggregate_statistics(&[]);
/// assert_eq!(stats.total_packets, 0);
/// assert!(stats.top_talkers.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketStatistics {
    pub total_packets: u64,
    /// Packet count per protocol label.
    pub protocol_distribution: BTreeMap<String, u64>,
    pub bandwidth: Bandwidth,
    pub errors: ErrorCounters,
    /// Conversation pairs ranked by byte volume, capped at [`TOP_TALKERS`].
    pub top_talkers: Vec<TalkerSummary>,
}

/// Byte volume totals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bandwidth {
    /// Sum of original packet lengths.
    pub total: u64,
    /// `total` over the capture duration, floored at one second.
    pub per_second: f64,
}

/// Flow anomaly counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCounters {
    pub retransmissions: u64,
    pub duplicate_acks: u64,
    /// TCP RST segments, counted independently of the other two.
    pub resets: u64,
}

/// One conversation pair in the top-talker ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkerSummary {
    /// First-seen orientation of the pair.
    pub source: String,
    pub destination: String,
    pub packets: u64,
    pub bytes: u64,
}

/// Fixed-size feature vector summarizing one capture's traffic character.
///
/// # Examples
/// ```
/// use packetlens_core::{aggregate_statistics, extract_pattern_signature};
///
/// let stats = aggregate_statistics(&[]);
/// let signature = extract_pattern_signature(&[], &stats);
/// assert_eq!(signature.avg_packet_size, 0.0);
/// assert_eq!(signature.unique_ips, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSignature {
    /// Most frequent protocol label (first-seen order breaks ties).
    pub dominant_protocol: String,
    /// Mean original packet length in bytes.
    pub avg_packet_size: f64,
    /// Retransmissions per hundred packets.
    pub retransmission_rate: f64,
    /// All flow anomalies per hundred packets.
    pub error_rate: f64,
    /// Distinct addresses across sources and destinations.
    #[serde(rename = "uniqueIPs")]
    pub unique_ips: u64,
}

/// Caller-supplied previously learned pattern; read-only input to
/// prediction. Persistence of the pattern library is external.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedPattern {
    pub signature: PatternSignature,
    /// Confidence in the learned outcome, 0.0 to 1.0.
    pub confidence_score: f64,
    /// Outcome observed when this pattern was learned.
    pub outcome: String,
}

/// Ranked predicted issues plus an overall 0-100 risk score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted_issues: Vec<PredictedIssue>,
    pub similar_patterns: Vec<SimilarPattern>,
    pub overall_risk_score: u32,
}

/// One predicted issue derived from a surviving learned pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedIssue {
    /// "high", "medium" or "low".
    pub severity: String,
    pub description: String,
    /// Rounded percentage confidence.
    pub confidence: u32,
}

/// Similarity record for a learned pattern that survived the threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarPattern {
    pub outcome: String,
    pub similarity: f64,
    pub confidence_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_serializes_with_interchange_field_names() {
        let mut packet = Packet::empty(3, 0.25);
        packet.protocol_label = "TCP".to_string();
        packet.flags.is_retransmission = true;

        let value = serde_json::to_value(&packet).expect("packet json");
        assert_eq!(value["protocolLabel"], "TCP");
        assert_eq!(value["infoSummary"], "");
        assert_eq!(value["flags"]["isRetransmission"], true);
        assert_eq!(value["flags"]["isDuplicateAck"], false);
    }

    #[test]
    fn layers_omit_absent_variants() {
        let packet = Packet::empty(0, 0.0);
        let value = serde_json::to_value(&packet).expect("packet json");
        assert!(value["layers"].get("tcp").is_none());
        assert!(value["layers"].get("http").is_none());
    }

    #[test]
    fn signature_serializes_unique_ips_field() {
        let signature = PatternSignature {
            dominant_protocol: "DNS".to_string(),
            avg_packet_size: 80.0,
            retransmission_rate: 0.0,
            error_rate: 0.0,
            unique_ips: 2,
        };
        let value = serde_json::to_value(&signature).expect("signature json");
        assert_eq!(value["uniqueIPs"], 2);
        assert_eq!(value["dominantProtocol"], "DNS");
    }
}
