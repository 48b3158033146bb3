//! Magic numbers and fixed offsets of the capture containers.

/// Legacy magic, microsecond timestamps, little-endian file.
pub const LEGACY_MAGIC_LE: [u8; 4] = [0xd4, 0xc3, 0xb2, 0xa1];
/// Legacy magic, microsecond timestamps, big-endian file.
pub const LEGACY_MAGIC_BE: [u8; 4] = [0xa1, 0xb2, 0xc3, 0xd4];
/// Legacy magic, nanosecond timestamps, little-endian file.
pub const LEGACY_NSEC_MAGIC_LE: [u8; 4] = [0x4d, 0x3c, 0xb2, 0xa1];
/// Legacy magic, nanosecond timestamps, big-endian file.
pub const LEGACY_NSEC_MAGIC_BE: [u8; 4] = [0xa1, 0xb2, 0x3c, 0x4d];

/// Block-structured container magic (section header block type).
pub const NG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];
/// Byte-order magic of a little-endian section, as it appears in the file.
pub const NG_BOM_LE: [u8; 4] = [0x4d, 0x3c, 0x2b, 0x1a];
/// Byte-order magic of a big-endian section, as it appears in the file.
pub const NG_BOM_BE: [u8; 4] = [0x1a, 0x2b, 0x3c, 0x4d];
/// Location of the byte-order magic inside a section header block.
pub const NG_BOM_RANGE: std::ops::Range<usize> = 8..12;

pub const MAGIC_LEN: usize = 4;
/// Default timestamp resolution exponent (microseconds).
pub const NG_DEFAULT_TSRESOL: u8 = 6;
