//! Cascading edit-request parser.
//!
//! Agent-generated edit requests nominally target YAML but routinely
//! violate it: unescaped newlines inside quoted scalars, inconsistent
//! quoting, nested quotes in code bodies. A single strict parser would
//! reject a large fraction of real inputs, so extraction is layered across
//! three independent strategies ordered from "assumes well-formed" to
//! "assumes nothing but key/quote anchors":
//!
//! 1. [`strict`] - the whole input is a valid YAML mapping.
//! 2. [`tolerant`] - permissive regex matching; block-style `code_edit: |`
//!    bodies are preserved verbatim.
//! 3. [`legacy`] - loose `:`/`=` anchors plus an escape-aware quote scan.
//!
//! Each strategy is a pure function `&str -> Option<EditRequest>` with no
//! shared state; the first non-`None` result is authoritative and later
//! strategies are never consulted. Strategy-internal failures never escape
//! the cascade.

mod legacy;
mod scanner;
mod strict;
mod tolerant;

pub use scanner::{resolve_escapes, scan_quoted};
use scribe_types::EditRequest;

/// Run the cascade. `None` means all three strategies were exhausted.
#[must_use]
pub fn parse_edit_request(content: &str) -> Option<EditRequest> {
    let strategies: [fn(&str) -> Option<EditRequest>; 3] =
        [strict::parse, tolerant::parse, legacy::parse];

    for (index, strategy) in strategies.iter().enumerate() {
        if let Some(request) = strategy(content) {
            tracing::debug!(strategy = index, target = %request.target_file, "parsed edit request");
            return Some(request);
        }
    }
    tracing::debug!("all parse strategies exhausted");
    None
}
