use std::net::{Ipv4Addr, Ipv6Addr};

use crate::DnsLayer;

use super::error::DnsError;
use super::layout;
use super::reader::DnsReader;

/// Attempt to decode a DNS message.
///
/// Returns `Ok(None)` when the payload is structurally valid bytes but
/// implausible as DNS (absurd section counts); truncation mid-message is an
/// error, which the layer decoder also treats as absence.
pub fn parse_dns(payload: &[u8]) -> Result<Option<DnsLayer>, DnsError> {
    if payload.len() < layout::HEADER_LEN {
        return Err(DnsError::Truncated {
            offset: payload.len(),
        });
    }

    let mut reader = DnsReader::new(payload);
    let transaction_id = reader.read_u16_be()?;
    let flags = reader.read_u16_be()?;
    let qdcount = reader.read_u16_be()?;
    let ancount = reader.read_u16_be()?;
    reader.skip(4)?; // authority and additional counts

    if qdcount > layout::MAX_QUESTIONS || ancount > layout::MAX_ANSWERS {
        return Ok(None);
    }

    let mut queries = Vec::with_capacity(qdcount as usize);
    for _ in 0..qdcount {
        let name = reader.read_name()?;
        reader.skip(4)?; // qtype and qclass
        queries.push(name);
    }

    let mut answers = Vec::with_capacity(ancount as usize);
    for _ in 0..ancount {
        let name = reader.read_name()?;
        let record_type = reader.read_u16_be()?;
        reader.skip(2)?; // class
        reader.skip(4)?; // ttl
        let rdlen = reader.read_u16_be()? as usize;
        let rdata_offset = reader.pos();
        let rdata = reader.read_slice(rdlen)?;
        answers.push(render_answer(
            payload,
            &name,
            record_type,
            rdata_offset,
            rdata,
        ));
    }

    Ok(Some(DnsLayer {
        transaction_id,
        is_query: flags & layout::FLAG_RESPONSE == 0,
        queries,
        answers,
    }))
}

/// Render one resource record as a display string.
fn render_answer(
    message: &[u8],
    name: &str,
    record_type: u16,
    rdata_offset: usize,
    rdata: &[u8],
) -> String {
    let value = match record_type {
        layout::TYPE_A if rdata.len() == 4 => {
            Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]).to_string()
        }
        layout::TYPE_AAAA if rdata.len() == 16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(rdata);
            Ipv6Addr::from(octets).to_string()
        }
        layout::TYPE_CNAME | layout::TYPE_NS | layout::TYPE_PTR => {
            DnsReader::at(message, rdata_offset)
                .read_name()
                .unwrap_or_else(|_| format!("{} bytes", rdata.len()))
        }
        layout::TYPE_MX if rdata.len() > 2 => DnsReader::at(message, rdata_offset + 2)
            .read_name()
            .unwrap_or_else(|_| format!("{} bytes", rdata.len())),
        layout::TYPE_TXT if !rdata.is_empty() => {
            let len = usize::from(rdata[0]).min(rdata.len() - 1);
            String::from_utf8_lossy(&rdata[1..1 + len]).into_owned()
        }
        _ => format!("type {record_type}, {} bytes", rdata.len()),
    };
    format!("{name} {} {value}", type_label(record_type))
}

fn type_label(record_type: u16) -> String {
    match record_type {
        layout::TYPE_A => "A".to_string(),
        layout::TYPE_NS => "NS".to_string(),
        layout::TYPE_CNAME => "CNAME".to_string(),
        layout::TYPE_PTR => "PTR".to_string(),
        layout::TYPE_MX => "MX".to_string(),
        layout::TYPE_TXT => "TXT".to_string(),
        layout::TYPE_AAAA => "AAAA".to_string(),
        other => format!("TYPE{other}"),
    }
}
