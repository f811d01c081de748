//! Strategy 1: semantic anchors.
//!
//! Well-authored leaflets mark each section heading with an explicit
//! anchor whose id is the section number. The section body is exactly
//! the sibling element that follows the heading.

use scraper::{ElementRef, Html, Selector};

use crate::models::Section;

use super::collapse_whitespace;

/// Extract sections by heading-id anchors. Empty when no heading carries
/// a numeric section id.
pub fn extract(doc: &Html) -> Vec<Section> {
    let headings = Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid selector");
    let mut sections = Vec::new();

    for number in 1u8..=6 {
        let id = number.to_string();
        let heading = doc
            .select(&headings)
            .find(|el| el.value().attr("id") == Some(id.as_str()));
        let Some(heading) = heading else {
            continue;
        };

        let Some(body) = next_sibling_element(heading) else {
            continue;
        };

        let title = collapse_whitespace(&heading.text().collect::<String>());
        if title.is_empty() {
            continue;
        }
        sections.push(Section::new(number, title, body.html()));
    }

    sections
}

fn next_sibling_element(el: ElementRef) -> Option<ElementRef> {
    el.next_siblings().find_map(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_sections_by_heading_id() {
        let doc = Html::parse_document(
            r#"<h2 id="1">What it is used for</h2><p>Pain relief.</p>
               <h2 id="2">Before you take it</h2><p>Do not take with X.</p>"#,
        );
        let sections = extract(&doc);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].number, 1);
        assert_eq!(sections[0].title, "What it is used for");
        assert!(sections[0].content.contains("Pain relief"));
        assert_eq!(sections[1].number, 2);
    }

    #[test]
    fn skips_heading_without_following_sibling() {
        let doc = Html::parse_document(r#"<div><h2 id="1">What it is used for</h2></div>"#);
        assert!(extract(&doc).is_empty());
    }

    #[test]
    fn ignores_non_numeric_ids() {
        let doc = Html::parse_document(
            r#"<h2 id="intro">Introduction</h2><p>Text.</p>"#,
        );
        assert!(extract(&doc).is_empty());
    }

    #[test]
    fn non_contiguous_numbers_are_kept_in_order() {
        let doc = Html::parse_document(
            r#"<h2 id="4">Possible side effects</h2><p>Nausea.</p>
               <h2 id="1">What it is used for</h2><p>Fever.</p>"#,
        );
        let sections = extract(&doc);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].number, 1);
        assert_eq!(sections[1].number, 4);
    }
}
