//! Container-variant detection and timestamp conventions.

use super::layout;

/// Recognized container variant, with the byte order the rest of the
/// capture must be read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Legacy fixed-record format.
    Legacy { big_endian: bool, nanos: bool },
    /// Block-structured format.
    Ng { big_endian: bool },
}

/// Classify a capture buffer by its magic-number prefix.
///
/// Returns `None` when the prefix matches no recognized container, which
/// includes buffers shorter than the magic itself.
pub fn detect_container(data: &[u8]) -> Option<ContainerKind> {
    let magic: &[u8; 4] = data.get(..layout::MAGIC_LEN)?.try_into().ok()?;
    match *magic {
        layout::LEGACY_MAGIC_LE => Some(ContainerKind::Legacy {
            big_endian: false,
            nanos: false,
        }),
        layout::LEGACY_MAGIC_BE => Some(ContainerKind::Legacy {
            big_endian: true,
            nanos: false,
        }),
        layout::LEGACY_NSEC_MAGIC_LE => Some(ContainerKind::Legacy {
            big_endian: false,
            nanos: true,
        }),
        layout::LEGACY_NSEC_MAGIC_BE => Some(ContainerKind::Legacy {
            big_endian: true,
            nanos: true,
        }),
        layout::NG_MAGIC => {
            let bom: [u8; 4] = data.get(layout::NG_BOM_RANGE)?.try_into().ok()?;
            match bom {
                layout::NG_BOM_LE => Some(ContainerKind::Ng { big_endian: false }),
                layout::NG_BOM_BE => Some(ContainerKind::Ng { big_endian: true }),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Timestamp units per second for an interface resolution byte.
///
/// The high bit selects a binary exponent, otherwise the value is a
/// decimal exponent. Defaults to microseconds for the zero byte some
/// writers emit.
pub fn ts_units_per_second(if_tsresol: u8) -> f64 {
    if if_tsresol == 0 {
        return 10f64.powi(layout::NG_DEFAULT_TSRESOL as i32);
    }
    if if_tsresol & 0x80 != 0 {
        2f64.powi((if_tsresol & 0x7f) as i32)
    } else {
        10f64.powi(if_tsresol as i32)
    }
}

/// Convert a split 64-bit block timestamp to fractional seconds.
pub fn ng_ts_to_seconds(ts_high: u32, ts_low: u32, units_per_second: f64) -> f64 {
    let ts = ((ts_high as u64) << 32) | (ts_low as u64);
    ts as f64 / units_per_second
}
