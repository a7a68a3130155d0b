//! Codec for list fields stored as a single delimited string.
//!
//! Skills, tags, and similar list-valued fields are persisted as one string
//! with a fixed `::` separator. Items must never contain the separator.

use crate::error::{Error, Result};

/// Fixed separator for list-valued fields.
pub const SEPARATOR: &str = "::";

/// Join a list of items into a single delimited string.
///
/// Fails with a validation error if any item contains the separator,
/// since that would corrupt the encoding.
pub fn join<S: AsRef<str>>(items: &[S]) -> Result<String> {
    for item in items {
        if item.as_ref().contains(SEPARATOR) {
            return Err(Error::validation(format!(
                "list item must not contain '{SEPARATOR}': {}",
                item.as_ref()
            )));
        }
    }
    Ok(items.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(SEPARATOR))
}

/// Split a delimited string back into its items.
///
/// The empty string decodes to the empty list.
pub fn split(encoded: &str) -> Vec<String> {
    if encoded.is_empty() {
        return Vec::new();
    }
    encoded.split(SEPARATOR).map(str::to_string).collect()
}
