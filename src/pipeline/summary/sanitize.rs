//! Response hygiene for oracle output.
//!
//! Models asked for plain prose still leak markdown. Refined summaries
//! are stripped of residual formatting before they are cached and shown.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s*").expect("valid regex"));
static BULLET_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*•]\s+").expect("valid regex"));
static NUMBERED_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s+").expect("valid regex"));
static BOLD_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid regex"));
static UNDERLINE_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_]+)__").expect("valid regex"));
static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").expect("valid regex"));
static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_([^_\n]+)_\b").expect("valid regex"));
static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Strip residual markdown-style formatting from a summary.
pub fn strip_markdown(text: &str) -> String {
    let text = HEADING_MARKERS.replace_all(text, "");
    let text = BULLET_MARKERS.replace_all(&text, "");
    let text = NUMBERED_MARKERS.replace_all(&text, "");
    let text = BOLD_MARKERS.replace_all(&text, "$1");
    let text = UNDERLINE_MARKERS.replace_all(&text, "$1");
    let text = ITALIC_STAR.replace_all(&text, "$1");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "$1");
    let text = EXCESS_BLANK_LINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Heuristic: does the text appear cut off mid-content?
pub fn is_likely_truncated(text: &str) -> bool {
    let trimmed = text.trim();
    let Some(last_char) = trimmed.chars().last() else {
        return false;
    };
    !matches!(last_char, '.' | '!' | '?' | ':' | '"' | ')' | ']')
}
