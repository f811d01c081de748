use serde::{Deserialize, Serialize};

/// One numbered, titled region of a leaflet document.
///
/// Produced by the section extractor and immutable afterwards. Numbers
/// follow the standard patient-information-leaflet layout (1..6) and are
/// unique within one extraction result, but not required to be contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub number: u8,
    pub title: String,
    /// Raw markup of the section body, exactly as found in the document.
    pub content: String,
}

impl Section {
    pub fn new(number: u8, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// One typed unit of displayable content.
///
/// A section's normalized content is an ordered sequence of blocks; the
/// order is display order. Blocks never carry empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Paragraph { text: String },
    Bold { text: String },
    Italic { text: String },
    BulletItem { text: String },
    NumberedItem { index: u32, text: String },
    SubHeading { text: String },
}

impl ContentBlock {
    /// The display text of this block, whatever its kind.
    pub fn text(&self) -> &str {
        match self {
            Self::Paragraph { text }
            | Self::Bold { text }
            | Self::Italic { text }
            | Self::BulletItem { text }
            | Self::NumberedItem { text, .. }
            | Self::SubHeading { text } => text,
        }
    }
}
