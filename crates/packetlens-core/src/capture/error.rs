use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Container-level capture errors.
///
/// Both variants travel inside the analysis result next to whatever data
/// was decoded before the error, so they also serialize for the output
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CaptureError {
    /// The buffer does not start with a recognized magic number; no frame
    /// is usable.
    #[error("unrecognized capture magic: {magic}")]
    Format {
        /// First bytes of the buffer, hex-encoded.
        magic: String,
    },
    /// A record or block could not be decoded past `offset`; every frame
    /// before it was decoded and returned.
    #[error("capture truncated at byte {offset} after {frames_decoded} frames: {message}")]
    #[serde(rename_all = "camelCase")]
    Truncated {
        /// Byte offset where decoding stopped.
        offset: usize,
        /// Number of frames successfully decoded before the stop.
        frames_decoded: usize,
        /// Description of the record that failed.
        message: String,
    },
}
