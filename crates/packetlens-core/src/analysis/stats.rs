//! Linear reduction of the flagged packet sequence into summary
//! statistics. No state beyond the accumulators; the output is rebuilt
//! fresh for every capture.

use std::collections::{BTreeMap, HashMap};

use crate::{Bandwidth, ErrorCounters, Packet, PacketStatistics, TOP_TALKERS, TalkerSummary};

#[derive(Debug, Default)]
struct TalkerAccumulator {
    /// First-seen orientation of the pair, kept for display.
    source: String,
    destination: String,
    packets: u64,
    bytes: u64,
    first_seen: usize,
}

/// Reduce packets into [`PacketStatistics`].
///
/// Invariants: the protocol distribution sums to `total_packets`, and the
/// top-talker byte total never exceeds `bandwidth.total`.
///
/// # Examples
/// ```
/// use packetlens_core::aggregate_statistics;
///
/// let stats = aggregate_statistics(&[]);
/// assert_eq!(stats.bandwidth.per_second, 0.0);
/// ```
pub fn aggregate_statistics(packets: &[Packet]) -> PacketStatistics {
    let mut distribution: BTreeMap<String, u64> = BTreeMap::new();
    let mut errors = ErrorCounters::default();
    let mut total_bytes = 0u64;
    let mut first_ts: Option<f64> = None;
    let mut last_ts: Option<f64> = None;
    let mut talkers: HashMap<(String, String), TalkerAccumulator> = HashMap::new();

    for (index, packet) in packets.iter().enumerate() {
        *distribution.entry(packet.protocol_label.clone()).or_insert(0) += 1;
        total_bytes += packet.length;

        first_ts = Some(first_ts.map_or(packet.timestamp, |ts| ts.min(packet.timestamp)));
        last_ts = Some(last_ts.map_or(packet.timestamp, |ts| ts.max(packet.timestamp)));

        if packet.flags.is_retransmission {
            errors.retransmissions += 1;
        }
        if packet.flags.is_duplicate_ack {
            errors.duplicate_acks += 1;
        }
        // Resets come straight off the TCP flag, independent of the flow
        // tracker's own flags.
        if packet
            .layers
            .tcp
            .as_ref()
            .is_some_and(|tcp| tcp.flags.rst)
        {
            errors.resets += 1;
        }

        let entry = talkers
            .entry(talker_key(packet))
            .or_insert_with(|| TalkerAccumulator {
                source: packet.source.clone(),
                destination: packet.destination.clone(),
                first_seen: index,
                ..TalkerAccumulator::default()
            });
        entry.packets += 1;
        entry.bytes += packet.length;
    }

    let duration = match (first_ts, last_ts) {
        (Some(first), Some(last)) => (last - first).max(1.0),
        _ => 1.0,
    };
    let per_second = if packets.is_empty() {
        0.0
    } else {
        total_bytes as f64 / duration
    };

    let mut ranked: Vec<TalkerAccumulator> = talkers.into_values().collect();
    ranked.sort_by(|a, b| {
        b.bytes
            .cmp(&a.bytes)
            .then_with(|| b.packets.cmp(&a.packets))
            .then_with(|| a.first_seen.cmp(&b.first_seen))
    });
    ranked.truncate(TOP_TALKERS);

    PacketStatistics {
        total_packets: packets.len() as u64,
        protocol_distribution: distribution,
        bandwidth: Bandwidth {
            total: total_bytes,
            per_second,
        },
        errors,
        top_talkers: ranked
            .into_iter()
            .map(|talker| TalkerSummary {
                source: talker.source,
                destination: talker.destination,
                packets: talker.packets,
                bytes: talker.bytes,
            })
            .collect(),
    }
}

/// Unordered address-pair key. Talkers are host conversations: both
/// directions and every port between the same two addresses accumulate
/// together.
fn talker_key(packet: &Packet) -> (String, String) {
    if packet.source <= packet.destination {
        (packet.source.clone(), packet.destination.clone())
    } else {
        (packet.destination.clone(), packet.source.clone())
    }
}
