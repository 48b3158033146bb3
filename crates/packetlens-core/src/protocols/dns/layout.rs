//! DNS wire-format offsets and constants.

pub const HEADER_LEN: usize = 12;

/// QR bit: set on responses.
pub const FLAG_RESPONSE: u16 = 0x8000;

/// Top two bits of a length byte mark a compression pointer.
pub const POINTER_TAG: u8 = 0xc0;
/// Upper bound on pointer jumps while decoding one name.
pub const MAX_NAME_JUMPS: usize = 16;
/// Labels are limited to 63 bytes by the wire format.
pub const MAX_LABEL_LEN: usize = 63;

/// Sanity caps: counts above these make the payload implausible as DNS.
pub const MAX_QUESTIONS: u16 = 32;
pub const MAX_ANSWERS: u16 = 128;

pub const TYPE_A: u16 = 1;
pub const TYPE_NS: u16 = 2;
pub const TYPE_CNAME: u16 = 5;
pub const TYPE_PTR: u16 = 12;
pub const TYPE_MX: u16 = 15;
pub const TYPE_TXT: u16 = 16;
pub const TYPE_AAAA: u16 = 28;
