//! Strategy 2: index hyperlinks.
//!
//! Some leaflets open with a table of contents linking to in-document
//! anchors. Link texts are classified against the section keyword rules;
//! the strategy is only trusted when at least three distinct sections
//! resolve, otherwise a partial index would yield a misleading skeleton.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Node, Selector};

use crate::models::Section;

use super::{collapse_whitespace, keywords};

/// Minimum distinct sections before the index strategy is accepted.
const MIN_RESOLVED_SECTIONS: usize = 3;

pub fn extract(doc: &Html) -> Vec<Section> {
    let internal_links = Selector::parse(r##"a[href^="#"]"##).expect("valid selector");

    // Classify link texts; first match per section number wins.
    let mut resolved: Vec<(u8, String, String)> = Vec::new();
    let mut seen_numbers: HashSet<u8> = HashSet::new();
    for link in doc.select(&internal_links) {
        let text = collapse_whitespace(&link.text().collect::<String>());
        let Some(number) = keywords::classify_title(&text) else {
            continue;
        };
        if !seen_numbers.insert(number) {
            continue;
        }
        let anchor = link.value().attr("href").unwrap_or("#")[1..].to_string();
        if anchor.is_empty() {
            continue;
        }
        resolved.push((number, text, anchor));
    }

    if resolved.len() < MIN_RESOLVED_SECTIONS {
        return Vec::new();
    }
    resolved.sort_by_key(|(number, _, _)| *number);

    // Resolve anchors to their target elements.
    let targets: Vec<(u8, String, ElementRef)> = resolved
        .into_iter()
        .filter_map(|(number, title, anchor)| {
            locate_anchor(doc, &anchor).map(|el| (number, title, el))
        })
        .collect();
    if targets.len() < MIN_RESOLVED_SECTIONS {
        return Vec::new();
    }

    let boundary_ids: HashSet<_> = targets.iter().map(|(_, _, el)| el.id()).collect();

    // Content is every sibling after the anchor up to (but excluding)
    // the next resolved anchor.
    targets
        .iter()
        .map(|(number, title, el)| {
            let mut content = String::new();
            for sibling in el.next_siblings() {
                if boundary_ids.contains(&sibling.id()) {
                    break;
                }
                match sibling.value() {
                    Node::Element(_) => {
                        if let Some(child) = ElementRef::wrap(sibling) {
                            content.push_str(&child.html());
                        }
                    }
                    Node::Text(text) => content.push_str(text),
                    _ => {}
                }
            }
            Section::new(*number, title.clone(), content)
        })
        .collect()
}

/// Locate the element an anchor refers to: by id first, then by the
/// legacy `a[name=...]` form.
fn locate_anchor<'a>(doc: &'a Html, anchor: &str) -> Option<ElementRef<'a>> {
    let all = Selector::parse("*").expect("valid selector");
    doc.select(&all)
        .find(|el| el.value().attr("id") == Some(anchor))
        .or_else(|| {
            doc.select(&all).find(|el| {
                el.value().name() == "a" && el.value().attr("name") == Some(anchor)
            })
        })
}
