//! Whitespace normalization.

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
