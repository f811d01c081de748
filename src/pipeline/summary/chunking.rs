//! Adaptive chunking for long section text.
//!
//! Split points start at even offsets and slide to the nearest sentence
//! boundary within a fixed window, searching backward first, then
//! forward. The final part absorbs any remainder.

use crate::config::{
    BOUNDARY_WINDOW_CHARS, MAX_PARTS, SINGLE_CALL_MAX_CHARS, THREE_PART_MAX_CHARS,
    TWO_PART_MAX_CHARS,
};

/// How many parts a section of `len` bytes is summarized in. One part
/// means the single-call path.
pub fn part_count(len: usize) -> usize {
    if len <= SINGLE_CALL_MAX_CHARS {
        1
    } else if len <= TWO_PART_MAX_CHARS {
        2
    } else if len <= THREE_PART_MAX_CHARS {
        3
    } else {
        MAX_PARTS
    }
}

/// Split content into `parts` slices at sentence-friendly offsets.
pub fn split_into_parts(content: &str, parts: usize) -> Vec<&str> {
    if parts <= 1 || content.is_empty() {
        return vec![content];
    }

    let len = content.len();
    let mut slices = Vec::with_capacity(parts);
    let mut start = 0;

    for i in 1..parts {
        let target = len * i / parts;
        let mut cut = snap_to_boundary(content, target).unwrap_or(target);
        while !content.is_char_boundary(cut) {
            cut -= 1;
        }
        // Boundaries must advance; a degenerate snap keeps the raw offset.
        if cut <= start {
            cut = target.min(len);
            while !content.is_char_boundary(cut) {
                cut -= 1;
            }
        }
        if cut <= start {
            continue;
        }
        slices.push(&content[start..cut]);
        start = cut;
    }

    slices.push(&content[start..]);
    slices
}

/// Find a sentence boundary near `target`: the position right after a
/// `.` or newline that is followed by whitespace or end-of-string.
/// Searches backward first, then forward, within the window.
fn snap_to_boundary(content: &str, target: usize) -> Option<usize> {
    let low = target.saturating_sub(BOUNDARY_WINDOW_CHARS);
    let high = (target + BOUNDARY_WINDOW_CHARS).min(content.len());

    (low..=target.min(content.len()))
        .rev()
        .find(|&i| is_sentence_boundary(content, i))
        .or_else(|| (target + 1..=high).find(|&i| is_sentence_boundary(content, i)))
}

fn is_sentence_boundary(content: &str, at: usize) -> bool {
    if at == 0 || at > content.len() {
        return false;
    }
    let bytes = content.as_bytes();
    let before = bytes[at - 1];
    if before != b'.' && before != b'\n' {
        return false;
    }
    at == content.len() || bytes[at].is_ascii_whitespace()
}

/// Char-boundary-safe prefix of at most `max` bytes.
pub fn head(content: &str, max: usize) -> &str {
    if content.len() <= max {
        return content;
    }
    let mut end = max;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_count_boundaries() {
        assert_eq!(part_count(2500), 1);
        assert_eq!(part_count(2501), 2);
        assert_eq!(part_count(5000), 2);
        assert_eq!(part_count(5001), 3);
        assert_eq!(part_count(8000), 3);
        assert_eq!(part_count(8001), 4);
        assert_eq!(part_count(100_000), 4);
    }

    #[test]
    fn parts_reassemble_to_the_original() {
        let text = "One sentence here. ".repeat(300); // 5700 chars -> 3 parts
        let parts = split_into_parts(&text, part_count(text.len()));
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn split_prefers_sentence_boundaries() {
        let text = "First sentence is right here. ".repeat(100); // 3000 chars -> 2 parts
        let parts = split_into_parts(&text, 2);
        assert_eq!(parts.len(), 2);
        // Each non-final part ends just after a period.
        assert!(parts[0].ends_with('.') || parts[0].ends_with(". "));
    }

    #[test]
    fn no_boundary_falls_back_to_raw_offset() {
        let text = "x".repeat(3000);
        let parts = split_into_parts(&text, 2);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 1500);
    }

    #[test]
    fn final_part_absorbs_remainder() {
        let text = "abc. ".repeat(700); // 3500 chars
        let parts = split_into_parts(&text, 2);
        assert_eq!(parts.concat().len(), text.len());
    }

    #[test]
    fn head_respects_char_boundaries() {
        let text = "aé".repeat(100); // 'é' is 2 bytes
        let prefix = head(&text, 4);
        assert!(prefix.len() <= 4);
        assert!(text.starts_with(prefix));
    }

    #[test]
    fn single_part_returns_whole_content() {
        assert_eq!(split_into_parts("short", 1), vec!["short"]);
    }
}
