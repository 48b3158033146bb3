//! HTTP request/response head decoding.
//!
//! The grammar check is deliberately strict: the payload must start with a
//! known method token or the `HTTP/` status-line prefix, be plausible ASCII
//! throughout the head, and contain the CRLF CRLF separator. Anything else
//! is not HTTP, silently.

use crate::HttpLayer;

const METHODS: [&str; 9] = [
    "GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH", "TRACE", "CONNECT",
];
const HEAD_SEPARATOR: &[u8] = b"\r\n\r\n";
const VERSION_PREFIX: &str = "HTTP/";

/// Attempt to decode an HTTP request or response head from a transport
/// payload. Returns `None` when the payload is not HTTP.
pub fn parse_http(payload: &[u8]) -> Option<HttpLayer> {
    let separator = find_separator(payload)?;
    let head = &payload[..separator];
    if !head_is_ascii(head) {
        return None;
    }
    let head = std::str::from_utf8(head).ok()?;
    let body = String::from_utf8_lossy(&payload[separator + HEAD_SEPARATOR.len()..]).into_owned();

    let mut lines = head.split("\r\n");
    let start_line = lines.next()?;

    let mut layer = if let Some(rest) = start_line.strip_prefix(VERSION_PREFIX) {
        parse_status_line(rest)?
    } else {
        parse_request_line(start_line)?
    };

    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':')?;
        insert_header(&mut layer.headers, key.trim(), value.trim());
    }
    layer.body = body;
    Some(layer)
}

fn parse_request_line(line: &str) -> Option<HttpLayer> {
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    if !METHODS.contains(&method) {
        return None;
    }
    let uri = parts.next()?;
    match parts.next() {
        Some(version) if version.starts_with(VERSION_PREFIX) => {}
        _ => return None,
    }
    Some(HttpLayer {
        is_request: true,
        method: Some(method.to_string()),
        uri: Some(uri.to_string()),
        status_code: None,
        status_text: None,
        headers: Vec::new(),
        body: String::new(),
    })
}

fn parse_status_line(after_prefix: &str) -> Option<HttpLayer> {
    // after_prefix looks like "1.1 404 Not Found".
    let (_version, rest) = after_prefix.split_once(' ')?;
    let (code, text) = match rest.split_once(' ') {
        Some((code, text)) => (code, text),
        None => (rest, ""),
    };
    let status_code: u16 = code.parse().ok()?;
    Some(HttpLayer {
        is_request: false,
        method: None,
        uri: None,
        status_code: Some(status_code),
        status_text: Some(text.to_string()),
        headers: Vec::new(),
        body: String::new(),
    })
}

/// Insert a header, overwriting an existing key in place. Matching is
/// case-insensitive but the first-seen key casing is kept.
fn insert_header(headers: &mut Vec<(String, String)>, key: &str, value: &str) {
    if let Some(slot) = headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
    {
        slot.1 = value.to_string();
    } else {
        headers.push((key.to_string(), value.to_string()));
    }
}

fn find_separator(payload: &[u8]) -> Option<usize> {
    payload
        .windows(HEAD_SEPARATOR.len())
        .position(|window| window == HEAD_SEPARATOR)
}

fn head_is_ascii(head: &[u8]) -> bool {
    head.iter()
        .all(|&b| b == b'\r' || b == b'\n' || b == b'\t' || (0x20..0x7f).contains(&b))
}

#[cfg(test)]
mod tests {
    use super::parse_http;

    #[test]
    fn parses_request_line_and_headers() {
        let layer = parse_http(b"GET /x HTTP/1.1\r\nHost: a\r\n\r\n").expect("http");
        assert!(layer.is_request);
        assert_eq!(layer.method.as_deref(), Some("GET"));
        assert_eq!(layer.uri.as_deref(), Some("/x"));
        assert_eq!(layer.headers, vec![("Host".to_string(), "a".to_string())]);
        assert_eq!(layer.body, "");
    }

    #[test]
    fn parses_status_line() {
        let layer = parse_http(b"HTTP/1.1 404 Not Found\r\n\r\n").expect("http");
        assert!(!layer.is_request);
        assert_eq!(layer.status_code, Some(404));
        assert_eq!(layer.status_text.as_deref(), Some("Not Found"));
    }

    #[test]
    fn duplicate_header_overwrites_in_place() {
        let layer = parse_http(
            b"GET / HTTP/1.1\r\nX-One: 1\r\nAccept: a\r\nx-one: 2\r\n\r\n",
        )
        .expect("http");
        assert_eq!(
            layer.headers,
            vec![
                ("X-One".to_string(), "2".to_string()),
                ("Accept".to_string(), "a".to_string()),
            ]
        );
    }

    #[test]
    fn body_is_preserved_after_separator() {
        let layer = parse_http(b"POST /s HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi").expect("http");
        assert_eq!(layer.body, "hi");
    }

    #[test]
    fn rejects_unknown_method() {
        assert!(parse_http(b"BREW /pot HTTP/1.1\r\n\r\n").is_none());
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(parse_http(b"GET /x HTTP/1.1\r\nHost: a\r\n").is_none());
    }

    #[test]
    fn rejects_binary_payload() {
        assert!(parse_http(&[0x16, 0x03, 0x03, 0x00, 0x05, 0x01, 0x00, 0x00]).is_none());
        assert!(parse_http(b"\x00\x01GET\r\n\r\n").is_none());
    }
}
