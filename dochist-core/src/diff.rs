//! Unified diffs between document revisions
//!
//! Documents are canonicalized to pretty-printed, key-sorted JSON and
//! diffed line by line, so a diff reflects content differences only,
//! never field insertion order.

use similar::TextDiff;

use crate::digest::canonical_pretty;
use crate::store::Document;

/// Compute a unified diff between two documents
///
/// Headers carry the caller-supplied labels (revision digests, in the
/// engine's case). Identical content yields an empty string.
pub fn unified_diff(a: &Document, b: &Document, label_a: &str, label_b: &str) -> String {
    let text_a = canonical_pretty(a);
    let text_b = canonical_pretty(b);
    if text_a == text_b {
        return String::new();
    }
    TextDiff::from_lines(&text_a, &text_b)
        .unified_diff()
        .header(label_a, label_b)
        .to_string()
}
