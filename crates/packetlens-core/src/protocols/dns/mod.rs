//! DNS message decoding.
//!
//! Decodes the fixed 12-byte header plus the question and answer sections,
//! including compressed names. Record data is rendered to display strings;
//! full resource-record modeling is left to downstream consumers.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::parse_dns;
