//! Stateless frame-to-packet decoding.
//!
//! Each frame is decoded independently through a strict top-down chain:
//! link, network, transport, then one optional application layer. A
//! higher-layer grammar mismatch leaves that layer empty; only a
//! structurally impossible lower-layer header marks the packet as errored.

use etherparse::{LinkSlice, NetSlice, SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

use crate::capture::Frame;
use crate::protocols::{dns, http, tls};
use crate::{DnsLayer, HttpLayer, IpLayer, Packet, TcpFlags, TcpLayer, TlsLayer, UdpLayer};

/// Well-known DNS port, checked on both TCP and UDP.
pub(crate) const DNS_PORT: u16 = 53;

/// Decode one frame into a packet. Flags default to all-false except
/// `has_warning` (snapped frame) and `has_error` (undecodable lower
/// layers); the remaining flags are owned by the flow tracker.
///
/// # Examples
/// ```
/// use packetlens_core::{Frame, decode_frame};
/// use pcap_parser::Linktype;
///
/// let frame = Frame {
///     ts: 0.0,
///     captured_len: 3,
///     original_len: 3,
///     linktype: Linktype::ETHERNET,
///     data: vec![0x01, 0x02, 0x03],
/// };
/// let packet = decode_frame(0, &frame);
/// assert!(packet.flags.has_error);
/// ```
pub fn decode_frame(id: u64, frame: &Frame) -> Packet {
    let mut packet = Packet::empty(id, frame.ts);
    packet.length = frame.original_len as u64;
    packet.flags.has_warning = frame.captured_len < frame.original_len;

    let sliced = match frame.linktype {
        Linktype::RAW | Linktype::IPV4 | Linktype::IPV6 => SlicedPacket::from_ip(&frame.data),
        _ => SlicedPacket::from_ethernet(&frame.data),
    };
    let sliced = match sliced {
        Ok(sliced) => sliced,
        Err(_) => {
            // Structurally impossible lower-layer header: keep the packet,
            // skip the rest of this frame's buffer.
            packet.flags.has_error = true;
            packet.info_summary = format!("{} bytes, undecodable frame", frame.original_len);
            return packet;
        }
    };

    if let Some(LinkSlice::Ethernet2(eth)) = &sliced.link {
        packet.protocol_label = "Ethernet".to_string();
        packet.source = format_mac(eth.source());
        packet.destination = format_mac(eth.destination());
        packet.info_summary = "Ethernet frame".to_string();
    }

    match &sliced.net {
        Some(NetSlice::Ipv4(ipv4)) => {
            let header = ipv4.header();
            packet.protocol_label = "IPv4".to_string();
            packet.source = header.source_addr().to_string();
            packet.destination = header.destination_addr().to_string();
            packet.info_summary = format!("IPv4 protocol {}", header.protocol().0);
            packet.layers.ip = Some(IpLayer {
                version: 4,
                ttl: header.ttl(),
                protocol: header.protocol().0,
            });
        }
        Some(NetSlice::Ipv6(ipv6)) => {
            let header = ipv6.header();
            packet.protocol_label = "IPv6".to_string();
            packet.source = header.source_addr().to_string();
            packet.destination = header.destination_addr().to_string();
            packet.info_summary = format!("IPv6 next header {}", header.next_header().0);
            packet.layers.ip = Some(IpLayer {
                version: 6,
                ttl: header.hop_limit(),
                protocol: header.next_header().0,
            });
        }
        _ => {}
    }

    let mut tcp_payload: &[u8] = &[];
    let mut udp_payload: &[u8] = &[];
    match &sliced.transport {
        Some(TransportSlice::Tcp(tcp)) => {
            tcp_payload = tcp.payload();
            let layer = TcpLayer {
                source_port: tcp.source_port(),
                dest_port: tcp.destination_port(),
                sequence_number: tcp.sequence_number(),
                acknowledgment_number: tcp.acknowledgment_number(),
                flags: TcpFlags {
                    syn: tcp.syn(),
                    ack: tcp.ack(),
                    fin: tcp.fin(),
                    rst: tcp.rst(),
                    psh: tcp.psh(),
                    urg: tcp.urg(),
                },
                window_size: tcp.window_size(),
                payload_bytes: tcp_payload.to_vec(),
            };
            packet.protocol_label = "TCP".to_string();
            packet.info_summary = tcp_summary(&layer);
            packet.layers.tcp = Some(layer);
        }
        Some(TransportSlice::Udp(udp)) => {
            udp_payload = udp.payload();
            let layer = UdpLayer {
                source_port: udp.source_port(),
                dest_port: udp.destination_port(),
                length: udp.length(),
            };
            packet.protocol_label = "UDP".to_string();
            packet.info_summary = format!(
                "{} → {} Len={}",
                layer.source_port, layer.dest_port, layer.length
            );
            packet.layers.udp = Some(layer);
        }
        _ => {}
    }

    // Application layer, gated by the transport payload. Resolution order
    // for the display label: HTTP > TLS > DNS.
    if let Some(tcp) = &packet.layers.tcp {
        if !tcp_payload.is_empty() {
            if let Some(layer) = http::parse_http(tcp_payload) {
                packet.protocol_label = "HTTP".to_string();
                packet.info_summary = http_summary(&layer);
                packet.layers.http = Some(layer);
            } else if let Ok(Some(layer)) = tls::parse_tls(tcp_payload) {
                packet.protocol_label = "TLS".to_string();
                packet.info_summary = tls_summary(&layer);
                packet.layers.tls = Some(layer);
            } else if (tcp.source_port == DNS_PORT || tcp.dest_port == DNS_PORT)
                && tcp_payload.len() > 2
            {
                // Over TCP the message carries a two-byte length prefix.
                if let Ok(Some(layer)) = dns::parse_dns(&tcp_payload[2..]) {
                    packet.protocol_label = "DNS".to_string();
                    packet.info_summary = dns_summary(&layer);
                    packet.layers.dns = Some(layer);
                }
            }
        }
    } else if let Some(udp) = &packet.layers.udp {
        if (udp.source_port == DNS_PORT || udp.dest_port == DNS_PORT) && !udp_payload.is_empty() {
            if let Ok(Some(layer)) = dns::parse_dns(udp_payload) {
                packet.protocol_label = "DNS".to_string();
                packet.info_summary = dns_summary(&layer);
                packet.layers.dns = Some(layer);
            }
        }
    }

    packet
}

fn format_mac(mac: [u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

fn tcp_summary(tcp: &TcpLayer) -> String {
    let mut names = Vec::new();
    if tcp.flags.syn {
        names.push("SYN");
    }
    if tcp.flags.fin {
        names.push("FIN");
    }
    if tcp.flags.rst {
        names.push("RST");
    }
    if tcp.flags.psh {
        names.push("PSH");
    }
    if tcp.flags.urg {
        names.push("URG");
    }
    if tcp.flags.ack {
        names.push("ACK");
    }
    format!(
        "{} → {} [{}] Seq={} Ack={} Win={} Len={}",
        tcp.source_port,
        tcp.dest_port,
        names.join(", "),
        tcp.sequence_number,
        tcp.acknowledgment_number,
        tcp.window_size,
        tcp.payload_bytes.len()
    )
}

fn http_summary(http: &HttpLayer) -> String {
    if http.is_request {
        format!(
            "{} {}",
            http.method.as_deref().unwrap_or(""),
            http.uri.as_deref().unwrap_or("")
        )
    } else {
        format!(
            "HTTP {} {}",
            http.status_code.unwrap_or(0),
            http.status_text.as_deref().unwrap_or("")
        )
        .trim_end()
        .to_string()
    }
}

fn dns_summary(dns: &DnsLayer) -> String {
    let kind = if dns.is_query { "query" } else { "response" };
    let subject = dns
        .queries
        .first()
        .cloned()
        .or_else(|| dns.answers.first().cloned())
        .unwrap_or_default();
    format!("Standard {kind} 0x{:04x} {subject}", dns.transaction_id)
        .trim_end()
        .to_string()
}

fn tls_summary(tls: &TlsLayer) -> String {
    let mut summary = tls.version.clone();
    if let Some(handshake) = &tls.handshake_type {
        summary.push(' ');
        summary.push_str(handshake);
    }
    if let Some(name) = &tls.server_name {
        summary.push_str(&format!(" (SNI: {name})"));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::decode_frame;
    use crate::capture::Frame;
    use pcap_parser::Linktype;

    fn ethernet_frame(ts: f64, payload: Vec<u8>) -> Frame {
        let len = payload.len() as u32;
        Frame {
            ts,
            captured_len: len,
            original_len: len,
            linktype: Linktype::ETHERNET,
            data: payload,
        }
    }

    fn build_ipv4_tcp(
        src: [u8; 4],
        dst: [u8; 4],
        sport: u16,
        dport: u16,
        seq: u32,
        flags: u8,
        payload: &[u8],
    ) -> Vec<u8> {
        let mut frame = Vec::new();
        frame.extend_from_slice(&[0x02; 6]);
        frame.extend_from_slice(&[0x01; 6]);
        frame.extend_from_slice(&0x0800u16.to_be_bytes());

        let total_len = 20 + 20 + payload.len() as u16;
        frame.push(0x45);
        frame.push(0);
        frame.extend_from_slice(&total_len.to_be_bytes());
        frame.extend_from_slice(&[0, 0, 0, 0]);
        frame.push(64);
        frame.push(6);
        frame.extend_from_slice(&[0, 0]);
        frame.extend_from_slice(&src);
        frame.extend_from_slice(&dst);

        frame.extend_from_slice(&sport.to_be_bytes());
        frame.extend_from_slice(&dport.to_be_bytes());
        frame.extend_from_slice(&seq.to_be_bytes());
        frame.extend_from_slice(&0u32.to_be_bytes());
        frame.push(0x50);
        frame.push(flags);
        frame.extend_from_slice(&1024u16.to_be_bytes());
        frame.extend_from_slice(&[0, 0, 0, 0]);
        frame.extend_from_slice(payload);
        frame
    }

    #[test]
    fn decodes_tcp_segment_fields() {
        let bytes = build_ipv4_tcp(
            [10, 0, 0, 1],
            [10, 0, 0, 2],
            40000,
            80,
            7,
            0x18, // PSH | ACK
            b"hello",
        );
        let packet = decode_frame(4, &ethernet_frame(1.0, bytes));

        assert_eq!(packet.id, 4);
        assert_eq!(packet.protocol_label, "TCP");
        assert_eq!(packet.source, "10.0.0.1");
        assert_eq!(packet.destination, "10.0.0.2");
        let tcp = packet.layers.tcp.expect("tcp layer");
        assert_eq!(tcp.source_port, 40000);
        assert_eq!(tcp.dest_port, 80);
        assert_eq!(tcp.sequence_number, 7);
        assert!(tcp.flags.psh && tcp.flags.ack);
        assert_eq!(tcp.payload_bytes, b"hello");
        let ip = packet.layers.ip.expect("ip layer");
        assert_eq!(ip.version, 4);
        assert_eq!(ip.protocol, 6);
        assert!(!packet.flags.has_error);
    }

    #[test]
    fn http_request_payload_promotes_label() {
        let bytes = build_ipv4_tcp(
            [10, 0, 0, 1],
            [10, 0, 0, 2],
            40000,
            80,
            1,
            0x18,
            b"GET /x HTTP/1.1\r\nHost: a\r\n\r\n",
        );
        let packet = decode_frame(0, &ethernet_frame(0.0, bytes));

        assert_eq!(packet.protocol_label, "HTTP");
        let http = packet.layers.http.expect("http layer");
        assert!(http.is_request);
        assert_eq!(http.method.as_deref(), Some("GET"));
        assert_eq!(http.uri.as_deref(), Some("/x"));
        assert_eq!(packet.info_summary, "GET /x");
    }

    #[test]
    fn impossible_data_offset_sets_error_flag() {
        let mut bytes = build_ipv4_tcp([10, 0, 0, 1], [10, 0, 0, 2], 1, 2, 0, 0x10, b"");
        // Data offset of 15 words points past the captured bytes.
        bytes[14 + 20 + 12] = 0xf0;
        let packet = decode_frame(0, &ethernet_frame(0.0, bytes));

        assert!(packet.flags.has_error);
        assert!(packet.layers.tcp.is_none());
    }

    #[test]
    fn non_ip_frame_keeps_link_label() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[0xff; 6]);
        bytes.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        bytes.extend_from_slice(&0x0806u16.to_be_bytes()); // ARP
        bytes.extend_from_slice(&[0u8; 28]);
        let packet = decode_frame(0, &ethernet_frame(0.0, bytes));

        assert_eq!(packet.protocol_label, "Ethernet");
        assert_eq!(packet.destination, "ff:ff:ff:ff:ff:ff");
        assert!(packet.layers.ip.is_none());
        assert!(!packet.flags.has_error);
    }

    #[test]
    fn snapped_frame_sets_warning() {
        let bytes = build_ipv4_tcp([10, 0, 0, 1], [10, 0, 0, 2], 1, 2, 0, 0x10, b"");
        let frame = Frame {
            ts: 0.0,
            captured_len: bytes.len() as u32,
            original_len: bytes.len() as u32 + 40,
            linktype: Linktype::ETHERNET,
            data: bytes,
        };
        let packet = decode_frame(0, &frame);
        assert!(packet.flags.has_warning);
        assert_eq!(packet.length, frame.original_len as u64);
    }
}
