//! Content normalization: arbitrary nested markup → a flat, ordered
//! sequence of typed, display-ready [`ContentBlock`]s.
//!
//! Two passes: [`flatten::flatten`] walks the tree into intermediate
//! elements (with pseudo-list detection and fragment merging), then each
//! element maps 1:1 onto a block, dropping blanks. Normalization never
//! fails — unrecognizable markup degrades to fewer blocks.

pub mod element;
pub mod flatten;

use crate::models::ContentBlock;

/// Normalize a markup fragment into display blocks.
pub fn normalize_to_blocks(markup: &str) -> Vec<ContentBlock> {
    if markup.trim().is_empty() {
        return Vec::new();
    }

    let elements = flatten::merge_fragments(flatten::flatten(markup));
    elements
        .into_iter()
        .filter_map(element::FlatElement::into_block)
        .collect()
}

/// Collapse whitespace runs to single spaces and trim.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
