//! Stateful flow tracking over the ordered packet sequence.
//!
//! This is the only stage with a strict ordering requirement: anomaly
//! detection depends on applying per-flow state packet by packet, in
//! ascending id order. The flow map is created per call and dropped on
//! return; no state crosses captures.

use std::collections::HashMap;

use crate::Packet;

const TCP_PROTO: u8 = 6;

/// Bidirectional conversation key. Endpoints are ordered canonically so
/// both directions of a conversation share one entry; direction is derived
/// per packet, not part of the key.
#[derive(Debug, Hash, PartialEq, Eq)]
struct FlowKey {
    protocol: u8,
    low: (String, u16),
    high: (String, u16),
}

#[derive(Debug, Default)]
struct DirectionState {
    /// Highest contiguous sequence end observed for data sent this way.
    highest_seq_end: Option<u32>,
    /// Last acknowledgment number recorded against this direction.
    last_ack: Option<u32>,
    consecutive_acks: u32,
}

#[derive(Debug, Default)]
struct FlowState {
    forward: DirectionState,
    reverse: DirectionState,
}

/// Classify each TCP segment against its flow history, setting the
/// retransmission and duplicate-ACK flags. Mutates only `flags`; the pass
/// is deterministic and idempotent for a given ordered sequence.
///
/// # Examples
/// ```
/// use packetlens_core::{Packet, track_flows};
///
/// let mut packets: Vec<Packet> = Vec::new();
/// track_flows(&mut packets);
/// assert!(packets.is_empty());
/// ```
pub fn track_flows(packets: &mut [Packet]) {
    let mut flows: HashMap<FlowKey, FlowState> = HashMap::new();

    for packet in packets.iter_mut() {
        // Re-running the pass must yield identical flags, so the flags this
        // stage owns are cleared before classification.
        packet.flags.is_retransmission = false;
        packet.flags.is_duplicate_ack = false;

        let Some(tcp) = packet.layers.tcp.as_ref() else {
            continue;
        };

        let src = (packet.source.clone(), tcp.source_port);
        let dst = (packet.destination.clone(), tcp.dest_port);
        let forward = src <= dst;
        let (low, high) = if forward {
            (src, dst)
        } else {
            (dst, src)
        };
        let state = flows
            .entry(FlowKey {
                protocol: TCP_PROTO,
                low,
                high,
            })
            .or_default();

        let payload_len = tcp.payload_bytes.len() as u32;
        if payload_len > 0 {
            let sent = if forward {
                &mut state.forward
            } else {
                &mut state.reverse
            };
            let seq_end = tcp.sequence_number.wrapping_add(payload_len);
            match sent.highest_seq_end {
                Some(highest) if seq_leq(seq_end, highest) => {
                    packet.flags.is_retransmission = true;
                }
                _ => sent.highest_seq_end = Some(seq_end),
            }
        }

        let pure_ack = payload_len == 0
            && tcp.flags.ack
            && !tcp.flags.syn
            && !tcp.flags.fin
            && !tcp.flags.rst;
        if pure_ack {
            let acked = if forward {
                &mut state.reverse
            } else {
                &mut state.forward
            };
            if acked.last_ack == Some(tcp.acknowledgment_number) {
                acked.consecutive_acks += 1;
                packet.flags.is_duplicate_ack = true;
            } else {
                acked.last_ack = Some(tcp.acknowledgment_number);
                acked.consecutive_acks = 1;
            }
        }

        if tcp.flags.rst {
            packet.flags.has_error = true;
        }
    }
}

/// Serial-number comparison: `a` is at or before `b` in sequence space.
fn seq_leq(a: u32, b: u32) -> bool {
    b.wrapping_sub(a) < 0x8000_0000
}
