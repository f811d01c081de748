//! Leaflet section extraction.
//!
//! Recovers the numbered section structure of a leaflet from markup that
//! may be inconsistently authored. Three strategies run in fixed
//! priority order and the first non-trivial result wins — no blending:
//!
//! 1. [`anchors`] — headings carrying the section number as their id.
//! 2. [`index_links`] — a table-of-contents of internal hyperlinks,
//!    trusted only when at least three sections resolve.
//! 3. [`heading_scan`] — a last-resort scan for `"<digit>. <title>"`
//!    text, which always succeeds (possibly with zero sections).
//!
//! Extraction never errors: a strategy that finds nothing degrades to
//! the next one, and a document with no recognizable structure yields an
//! empty list.

pub mod anchors;
pub mod heading_scan;
pub mod index_links;
pub mod keywords;

use scraper::Html;

use crate::models::Section;

/// Extract the ordered section list from leaflet markup.
pub fn extract_sections(markup: &str) -> Vec<Section> {
    let doc = Html::parse_document(markup);

    let by_anchor = anchors::extract(&doc);
    if !by_anchor.is_empty() {
        tracing::info!(sections = by_anchor.len(), "extracted via semantic anchors");
        return by_anchor;
    }

    let by_index = index_links::extract(&doc);
    if !by_index.is_empty() {
        tracing::info!(sections = by_index.len(), "extracted via index links");
        return by_index;
    }

    let by_scan = heading_scan::extract(&doc);
    tracing::info!(sections = by_scan.len(), "extracted via heading scan");
    by_scan
}

/// Collapse whitespace runs to single spaces and trim.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
