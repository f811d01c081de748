//! Per-section keyword rules for the standard leaflet layout.
//!
//! Patient information leaflets follow a fixed six-section structure.
//! Strategies 2 and 3 both classify candidate headings against these
//! rules, and the summarizer reuses the section-3 rule to detect
//! dosage-related titles.

/// Key phrases for each of the six standard sections. A candidate title
/// matches a section when it contains any of that section's phrases.
const SECTION_KEYWORDS: [&[&str]; 6] = [
    // 1. What the medicine is and what it is used for
    &["used for", "what it is", "indicated"],
    // 2. What you need to know before you take it
    &["before you", "before taking", "before using", "need to know", "do not take"],
    // 3. How to take it
    &["how to take", "how to use", "how you take", "dosage", "dose"],
    // 4. Possible side effects
    &["side effect", "adverse", "undesirable"],
    // 5. How to store it
    &["how to store", "storage", "storing", "keep this medicine"],
    // 6. Contents of the pack and other information
    &["contents of the pack", "further information", "other information", "pack contents"],
];

/// Does `title` satisfy the keyword rule for `section_number` (1..6)?
pub fn title_matches_section(section_number: u8, title: &str) -> bool {
    if !(1..=6).contains(&section_number) {
        return false;
    }
    let lower = title.to_lowercase();
    SECTION_KEYWORDS[(section_number - 1) as usize]
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// Classify a free-standing title against all six rule sets.
///
/// Returns the first matching section number. Rules are checked in
/// section order, so a title matching several rules resolves to the
/// lowest-numbered section.
pub fn classify_title(title: &str) -> Option<u8> {
    (1..=6).find(|&n| title_matches_section(n, title))
}

/// Is this section title about dosing? Used to strengthen the summary
/// prompt for dosage sections.
pub fn is_dosage_title(title: &str) -> bool {
    title_matches_section(3, title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_titles_classify() {
        assert_eq!(classify_title("What Paracetamol is and what it is used for"), Some(1));
        assert_eq!(classify_title("Before you take this medicine"), Some(2));
        assert_eq!(classify_title("How to take Paracetamol"), Some(3));
        assert_eq!(classify_title("Possible side effects"), Some(4));
        assert_eq!(classify_title("How to store this medicine"), Some(5));
        assert_eq!(classify_title("Contents of the pack and other information"), Some(6));
    }

    #[test]
    fn unrelated_text_does_not_classify() {
        assert_eq!(classify_title("Manufacturer address"), None);
        assert_eq!(classify_title(""), None);
    }

    #[test]
    fn match_is_case_insensitive() {
        assert!(title_matches_section(4, "POSSIBLE SIDE EFFECTS"));
    }

    #[test]
    fn out_of_range_section_never_matches() {
        assert!(!title_matches_section(0, "side effects"));
        assert!(!title_matches_section(7, "side effects"));
    }

    #[test]
    fn dosage_title_detection() {
        assert!(is_dosage_title("How to take this medicine"));
        assert!(is_dosage_title("Dosage and administration"));
        assert!(!is_dosage_title("Possible side effects"));
    }
}
