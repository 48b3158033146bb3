use crate::TlsLayer;

use super::error::TlsError;
use super::layout;
use super::reader::TlsReader;

/// Attempt to decode the first TLS record of a transport payload.
///
/// Returns `Ok(None)` when the first bytes are not a plausible record
/// header. Decodes the handshake message type when present and, for a
/// ClientHello, scans the extensions for the Server Name Indication; a
/// truncated ClientHello still yields the record-level metadata.
pub fn parse_tls(payload: &[u8]) -> Result<Option<TlsLayer>, TlsError> {
    if payload.len() < layout::RECORD_HEADER_LEN {
        return Ok(None);
    }
    let content_type = payload[layout::CONTENT_TYPE_OFFSET];
    if !(layout::CONTENT_CHANGE_CIPHER_SPEC..=layout::CONTENT_APPLICATION_DATA)
        .contains(&content_type)
    {
        return Ok(None);
    }
    let major = payload[layout::VERSION_MAJOR_OFFSET];
    let minor = payload[layout::VERSION_MINOR_OFFSET];
    if major != layout::VERSION_MAJOR || minor > layout::VERSION_MINOR_MAX {
        return Ok(None);
    }

    let body = &payload[layout::RECORD_HEADER_LEN..];
    let mut handshake_type = None;
    let mut server_name = None;
    if content_type == layout::CONTENT_HANDSHAKE && !body.is_empty() {
        handshake_type = Some(handshake_label(body[0]));
        if body[0] == layout::HANDSHAKE_CLIENT_HELLO {
            // Best effort: a snapped ClientHello keeps the record metadata.
            server_name = client_hello_server_name(body).ok().flatten();
        }
    }

    Ok(Some(TlsLayer {
        version: version_label(minor),
        handshake_type,
        server_name,
    }))
}

/// Walk a ClientHello body looking for the SNI host name.
fn client_hello_server_name(body: &[u8]) -> Result<Option<String>, TlsError> {
    let mut reader = TlsReader::new(body);
    reader.skip(layout::HANDSHAKE_HEADER_LEN)?;
    reader.skip(2)?; // legacy client version
    reader.skip(layout::CLIENT_HELLO_RANDOM_LEN)?;
    reader.skip_u8_vector()?; // session id
    reader.skip_u16_vector()?; // cipher suites
    reader.skip_u8_vector()?; // compression methods

    let extensions_len = reader.read_u16_be()?;
    let mut remaining = usize::from(extensions_len);
    while remaining >= 4 {
        let ext_type = reader.read_u16_be()?;
        let ext_len = usize::from(reader.read_u16_be()?);
        remaining = remaining.saturating_sub(4 + ext_len);

        if ext_type != layout::EXT_SERVER_NAME {
            reader.skip(ext_len)?;
            continue;
        }
        reader.skip(2)?; // server name list length
        let name_type = reader.read_u8()?;
        let name_len = usize::from(reader.read_u16_be()?);
        let name = reader.read_slice(name_len)?;
        if name_type == layout::SNI_HOST_NAME {
            return Ok(Some(String::from_utf8_lossy(name).into_owned()));
        }
        return Ok(None);
    }
    Ok(None)
}

fn version_label(minor: u8) -> String {
    match minor {
        0x00 => "SSL 3.0".to_string(),
        0x01 => "TLS 1.0".to_string(),
        0x02 => "TLS 1.1".to_string(),
        0x03 => "TLS 1.2".to_string(),
        0x04 => "TLS 1.3".to_string(),
        other => format!("TLS (0x03{other:02x})"),
    }
}

fn handshake_label(handshake_type: u8) -> String {
    match handshake_type {
        layout::HANDSHAKE_CLIENT_HELLO => "ClientHello".to_string(),
        layout::HANDSHAKE_SERVER_HELLO => "ServerHello".to_string(),
        layout::HANDSHAKE_NEW_SESSION_TICKET => "NewSessionTicket".to_string(),
        layout::HANDSHAKE_CERTIFICATE => "Certificate".to_string(),
        layout::HANDSHAKE_SERVER_KEY_EXCHANGE => "ServerKeyExchange".to_string(),
        layout::HANDSHAKE_SERVER_HELLO_DONE => "ServerHelloDone".to_string(),
        layout::HANDSHAKE_CLIENT_KEY_EXCHANGE => "ClientKeyExchange".to_string(),
        layout::HANDSHAKE_FINISHED => "Finished".to_string(),
        other => format!("handshake type {other}"),
    }
}
