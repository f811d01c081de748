//! Strategy 3: heading scan (last resort).
//!
//! Walks block and inline nodes in document order and looks for text of
//! the form `"<1-6><separator> <title>"` whose title also satisfies the
//! section keyword rules. Everything between two recognized headers
//! accumulates into the open section. Always succeeds, possibly with
//! zero sections.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::Section;

use super::{collapse_whitespace, keywords};

/// Body copy longer than this cannot open a section header.
const MAX_HEADER_CHARS: usize = 200;

/// Leading `"<digit 1-6><separator> rest"` header shape.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-6])\s*[.)\-–:]?\s+(.{3,})$").expect("valid regex"));

pub fn extract(doc: &Html) -> Vec<Section> {
    let candidates = Selector::parse("p, h1, h2, h3, h4, h5, h6, li, div, span, b, strong")
        .expect("valid selector");

    let mut sections: Vec<Section> = Vec::new();
    let mut open: Option<Section> = None;
    let mut current_number: u8 = 0;

    for el in doc.select(&candidates) {
        // Containers re-appear with the text of their children; only the
        // innermost matching elements are scanned, once each.
        if has_candidate_descendant(el) {
            continue;
        }

        let text = collapse_whitespace(&el.text().collect::<String>());
        if text.is_empty() {
            continue;
        }

        if let Some((number, title)) = parse_header(&text) {
            // Headers never go backward in a leaflet.
            if number > current_number {
                if let Some(done) = open.take() {
                    sections.push(done);
                }
                open = Some(Section::new(number, title, String::new()));
                current_number = number;
                continue;
            }
        }

        // Body copy before the first header has nowhere to go.
        if let Some(section) = open.as_mut() {
            section.content.push_str(&el.html());
        }
    }

    if let Some(done) = open.take() {
        sections.push(done);
    }
    sections
}

/// Does this text open a section? The digit alone is not enough — the
/// remainder must satisfy the keyword rule for that section number.
fn parse_header(text: &str) -> Option<(u8, String)> {
    if text.len() > MAX_HEADER_CHARS {
        return None;
    }
    let caps = HEADER_RE.captures(text)?;
    let number: u8 = caps[1].parse().ok()?;
    let title = caps[2].trim().to_string();
    keywords::title_matches_section(number, &title).then_some((number, title))
}

fn has_candidate_descendant(el: ElementRef) -> bool {
    const CANDIDATE_TAGS: &[&str] = &[
        "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "div", "span", "b", "strong",
    ];
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|child| CANDIDATE_TAGS.contains(&child.value().name()))
}
