//! TLS record and ClientHello wire-format constants.

pub const RECORD_HEADER_LEN: usize = 5;
pub const CONTENT_TYPE_OFFSET: usize = 0;
pub const VERSION_MAJOR_OFFSET: usize = 1;
pub const VERSION_MINOR_OFFSET: usize = 2;

pub const CONTENT_CHANGE_CIPHER_SPEC: u8 = 20;
pub const CONTENT_HANDSHAKE: u8 = 22;
pub const CONTENT_APPLICATION_DATA: u8 = 23;

/// All record protocol versions share the 0x03 major byte.
pub const VERSION_MAJOR: u8 = 0x03;
/// Highest assigned minor version (TLS 1.3).
pub const VERSION_MINOR_MAX: u8 = 0x04;

pub const HANDSHAKE_CLIENT_HELLO: u8 = 1;
pub const HANDSHAKE_SERVER_HELLO: u8 = 2;
pub const HANDSHAKE_NEW_SESSION_TICKET: u8 = 4;
pub const HANDSHAKE_CERTIFICATE: u8 = 11;
pub const HANDSHAKE_SERVER_KEY_EXCHANGE: u8 = 12;
pub const HANDSHAKE_SERVER_HELLO_DONE: u8 = 14;
pub const HANDSHAKE_CLIENT_KEY_EXCHANGE: u8 = 16;
pub const HANDSHAKE_FINISHED: u8 = 20;

/// Length of the ClientHello random field.
pub const CLIENT_HELLO_RANDOM_LEN: usize = 32;
/// Handshake message header: type byte plus 24-bit length.
pub const HANDSHAKE_HEADER_LEN: usize = 4;

pub const EXT_SERVER_NAME: u16 = 0;
/// SNI name type for a DNS host name.
pub const SNI_HOST_NAME: u8 = 0;
