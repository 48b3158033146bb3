use thiserror::Error;

/// Errors returned by TLS reading and parsing.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("record truncated at offset {offset}")]
    Truncated { offset: usize },
}
