//! Application-protocol decoding modules.
//!
//! Binary protocols follow a layered structure:
//! - `layout`: byte offsets and well-known constants (source of truth)
//! - `reader`: safe byte access and protocol conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O. A parser returning `Ok(None)` means
//! the payload is simply not that protocol; the layer decoder treats parse
//! errors the same way, per the absence-of-layer policy.

pub mod dns;
pub mod http;
pub mod tls;
