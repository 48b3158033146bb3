//! TLS record decoding, limited to unencrypted handshake metadata.
//!
//! Only the record header, the handshake message type, and the Server Name
//! Indication of a ClientHello are decoded. Encrypted content is never
//! inspected.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::parse_tls;
