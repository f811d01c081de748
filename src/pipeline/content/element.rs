//! Intermediate flattened elements and pseudo-list detection.
//!
//! Pass 1 of normalization reduces the markup tree to a linear sequence
//! of these elements; pass 2 maps them 1:1 onto [`ContentBlock`]s.
//!
//! The bullet and numbered patterns are applied in two places — raw text
//! nodes, and prose re-split around nested lists — and must be the same
//! patterns both times so pseudo-lists behave consistently.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ContentBlock;

/// One flattened unit of content, before blank-dropping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatElement {
    Paragraph(String),
    Bold(String),
    Italic(String),
    Bullet(String),
    Numbered { index: Option<u32>, text: String },
    SubHeading(String),
}

/// Leading bullet-like glyph followed by whitespace.
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•◦▪‣·∙*–-]\s+(.+)$").expect("valid regex"));

/// Leading `"<digits><. | ) | -> "` marker.
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.)\-]\s+(.+)$").expect("valid regex"));

/// Classify one run of plain text: pseudo-bullet, pseudo-numbered item,
/// or paragraph.
pub fn classify_text(text: &str) -> FlatElement {
    let trimmed = text.trim();
    if let Some(caps) = BULLET_RE.captures(trimmed) {
        return FlatElement::Bullet(caps[1].trim().to_string());
    }
    if let Some(caps) = NUMBERED_RE.captures(trimmed) {
        let index = caps[1].parse().ok();
        return FlatElement::Numbered {
            index,
            text: caps[2].trim().to_string(),
        };
    }
    FlatElement::Paragraph(trimmed.to_string())
}

impl FlatElement {
    /// Pass 2: map to the display block, or `None` for blank text.
    /// Numbered items with an unparseable index default to 1.
    pub fn into_block(self) -> Option<ContentBlock> {
        let block = match self {
            Self::Paragraph(text) => ContentBlock::Paragraph { text },
            Self::Bold(text) => ContentBlock::Bold { text },
            Self::Italic(text) => ContentBlock::Italic { text },
            Self::Bullet(text) => ContentBlock::BulletItem { text },
            Self::Numbered { index, text } => ContentBlock::NumberedItem {
                index: index.unwrap_or(1),
                text,
            },
            Self::SubHeading(text) => ContentBlock::SubHeading { text },
        };
        (!block.text().trim().is_empty()).then_some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_glyph_detected() {
        assert_eq!(
            classify_text("• Take with food"),
            FlatElement::Bullet("Take with food".into()),
        );
        assert_eq!(
            classify_text("- Avoid alcohol"),
            FlatElement::Bullet("Avoid alcohol".into()),
        );
    }

    #[test]
    fn numbered_marker_detected() {
        assert_eq!(
            classify_text("3. Take with water"),
            FlatElement::Numbered {
                index: Some(3),
                text: "Take with water".into(),
            },
        );
        assert_eq!(
            classify_text("2) Swallow whole"),
            FlatElement::Numbered {
                index: Some(2),
                text: "Swallow whole".into(),
            },
        );
    }

    #[test]
    fn plain_prose_is_a_paragraph() {
        assert_eq!(
            classify_text("  Take twice daily.  "),
            FlatElement::Paragraph("Take twice daily.".into()),
        );
    }

    #[test]
    fn dose_amounts_are_not_numbered_items() {
        // "500mg" and "2 tablets"-style text must not be mistaken for
        // list markers: the marker needs a separator before the space.
        assert!(matches!(classify_text("500mg twice daily"), FlatElement::Paragraph(_)));
        assert!(matches!(classify_text("2 tablets every morning"), FlatElement::Paragraph(_)));
    }

    #[test]
    fn blank_elements_drop_in_pass_two() {
        assert!(FlatElement::Paragraph("   ".into()).into_block().is_none());
        assert!(FlatElement::Bullet(String::new()).into_block().is_none());
    }

    #[test]
    fn missing_index_defaults_to_one() {
        let block = FlatElement::Numbered {
            index: None,
            text: "First".into(),
        }
        .into_block()
        .unwrap();
        assert_eq!(block, ContentBlock::NumberedItem { index: 1, text: "First".into() });
    }
}
