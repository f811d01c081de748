//! Pass 1: flatten the markup tree into linear elements.
//!
//! A recursive walk over the parsed tree. List containers recurse, list
//! items carry their ordinal when the parent is ordered, generic blocks
//! are split around nested lists so inline lists survive as list
//! elements, and raw text runs through pseudo-list detection.

use scraper::{ElementRef, Html, Node};

use super::element::{classify_text, FlatElement};
use super::collapse_whitespace;

/// Paragraph fragments below this length are merge candidates.
const MERGE_MAX_CHARS: usize = 50;

pub fn flatten(markup: &str) -> Vec<FlatElement> {
    let doc = Html::parse_fragment(markup);
    let mut out = Vec::new();
    walk_children(doc.root_element(), &mut out);
    out
}

/// Post-process: greedily merge consecutive short paragraphs. Titles and
/// labels split across markup nodes come back together here; anything
/// that is not a paragraph flushes the pending buffer first.
pub fn merge_fragments(elements: Vec<FlatElement>) -> Vec<FlatElement> {
    let mut out = Vec::new();
    let mut pending: Option<String> = None;

    for element in elements {
        match element {
            FlatElement::Paragraph(text) => match pending.take() {
                Some(acc) if acc.len() < MERGE_MAX_CHARS && text.len() < MERGE_MAX_CHARS => {
                    pending = Some(format!("{acc} {text}"));
                }
                Some(acc) => {
                    out.push(FlatElement::Paragraph(acc));
                    pending = Some(text);
                }
                None => pending = Some(text),
            },
            other => {
                if let Some(acc) = pending.take() {
                    out.push(FlatElement::Paragraph(acc));
                }
                out.push(other);
            }
        }
    }

    if let Some(acc) = pending {
        out.push(FlatElement::Paragraph(acc));
    }
    out
}

/// Walk an element's children: text runs through pseudo-list detection,
/// child elements dispatch by tag.
fn walk_children(el: ElementRef, out: &mut Vec<FlatElement>) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = collapse_whitespace(text);
                if !trimmed.is_empty() {
                    out.push(classify_text(&trimmed));
                }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    walk_element(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn walk_element(el: ElementRef, out: &mut Vec<FlatElement>) {
    match el.value().name() {
        "ul" | "ol" => walk_children(el, out),
        "li" => emit_list_item(el, out),
        "p" | "div" | "section" | "article" => process_block(el, out),
        "h1" | "h2" | "h3" | "table" => {
            out.push(FlatElement::Paragraph(collapse_whitespace(
                &el.text().collect::<String>(),
            )));
        }
        "h4" | "h5" | "h6" => {
            out.push(FlatElement::SubHeading(collapse_whitespace(
                &el.text().collect::<String>(),
            )));
        }
        "b" | "strong" => {
            out.push(FlatElement::Bold(collapse_whitespace(&children_inline_text(el))));
        }
        "i" | "em" => {
            out.push(FlatElement::Italic(collapse_whitespace(&children_inline_text(el))));
        }
        // A natural paragraph boundary; nothing to emit.
        "br" => {}
        _ => walk_children(el, out),
    }
}

/// Emit a list item: numbered (1-based ordinal) when the parent list is
/// ordered, bullet otherwise. Nested lists inside the item are excluded
/// from its text and walked separately afterwards.
fn emit_list_item(el: ElementRef, out: &mut Vec<FlatElement>) {
    let text = collapse_whitespace(&children_inline_text(el));

    let ordered_parent = el
        .parent()
        .and_then(ElementRef::wrap)
        .map(|p| p.value().name() == "ol")
        .unwrap_or(false);

    if ordered_parent {
        let position = el
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|s| s.value().name() == "li")
            .count() as u32
            + 1;
        out.push(FlatElement::Numbered {
            index: Some(position),
            text,
        });
    } else {
        out.push(FlatElement::Bullet(text));
    }

    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if matches!(child_el.value().name(), "ul" | "ol") {
                walk_element(child_el, out);
            }
        }
    }
}

/// Flatten a generic block. Inline content accumulates into a prose
/// buffer; a nested block-level child (paragraph, list, heading) flushes
/// the buffer and is walked on its own, so "text before", the nested
/// block, and "text after" each come out in order as separate elements.
fn process_block(el: ElementRef, out: &mut Vec<FlatElement>) {
    let mut buffer = String::new();

    for child in el.children() {
        match child.value() {
            Node::Text(text) => buffer.push_str(text),
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_block_tag(child_el.value().name()) || subtree_has_list(child_el) {
                    flush_prose(&mut buffer, out);
                    walk_element(child_el, out);
                } else if child_el.value().name() == "br" {
                    buffer.push('\n');
                } else {
                    buffer.push_str(&inline_text(child_el));
                }
            }
            _ => {}
        }
    }

    flush_prose(&mut buffer, out);
}

fn is_block_tag(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "section"
            | "article"
            | "ul"
            | "ol"
            | "li"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "table"
    )
}

/// Re-split buffered prose on line breaks and reclassify each line with
/// the same pseudo-list patterns used for raw text nodes.
fn flush_prose(buffer: &mut String, out: &mut Vec<FlatElement>) {
    for line in buffer.lines() {
        let collapsed = collapse_whitespace(line);
        if !collapsed.is_empty() {
            out.push(classify_text(&collapsed));
        }
    }
    buffer.clear();
}

/// Combined inline text of an element, wrapping bold runs in doubled
/// markers and italic runs in single markers. Nested list subtrees are
/// skipped — they are emitted as elements of their own.
fn inline_text(el: ElementRef) -> String {
    match el.value().name() {
        "ul" | "ol" => String::new(),
        "br" => "\n".to_string(),
        "b" | "strong" => format!("**{}**", children_inline_text(el)),
        "i" | "em" => format!("*{}*", children_inline_text(el)),
        _ => children_inline_text(el),
    }
}

fn children_inline_text(el: ElementRef) -> String {
    let mut text = String::new();
    for child in el.children() {
        match child.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    text.push_str(&inline_text(child_el));
                }
            }
            _ => {}
        }
    }
    text
}

fn subtree_has_list(el: ElementRef) -> bool {
    if matches!(el.value().name(), "ul" | "ol") {
        return true;
    }
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|d| matches!(d.value().name(), "ul" | "ol"))
}
