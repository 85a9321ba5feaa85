//! Name-derived entity identifiers.
//!
//! Identifiers are the base64 encoding of the entity name, truncated to
//! [`MAX_ID_LEN`] characters. The same name always derives the same id, which
//! is what makes duplicate creation requests detectable as conflicts instead
//! of silently inserting a second record.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Maximum length of a derived identifier.
///
/// Truncation discards information: two distinct names sharing the same
/// encoded prefix derive the same id and the second create surfaces as a
/// conflict. That is part of the id contract, do not swap in a
/// collision-free scheme without also rethinking conflict semantics.
pub const MAX_ID_LEN: usize = 22;

/// Derive the identifier for an entity name.
pub fn derive_id(name: &str) -> String {
    let mut encoded = STANDARD.encode(name.as_bytes());
    // base64 output is ASCII, truncating at a byte offset is safe
    encoded.truncate(MAX_ID_LEN);
    encoded
}
