use thiserror::Error;

/// Errors returned by DNS reading and parsing.
#[derive(Debug, Error)]
pub enum DnsError {
    #[error("message truncated at offset {offset}")]
    Truncated { offset: usize },
    #[error("name compression loop at offset {offset}")]
    PointerLoop { offset: usize },
    #[error("label too long at offset {offset}: {length}")]
    LabelTooLong { offset: usize, length: usize },
}
