//! Prompt builders for the summarization conversation.

use crate::models::RefinementMode;
use crate::pipeline::sections::keywords;

const PLAIN_LANGUAGE_RULES: &str = "\
You explain medicine leaflets to patients. Use plain, everyday language. \
Never add information that is not in the text. Never give medical advice \
beyond what the leaflet states.";

/// Single-call summary of a whole section (3-4 sentences).
pub fn single_summary_prompt(title: &str, content: &str) -> String {
    let mut prompt = format!(
        "{PLAIN_LANGUAGE_RULES}\n\n\
         Summarize the leaflet section \"{title}\" below in 3-4 plain sentences.\n"
    );
    if keywords::is_dosage_title(title) {
        prompt.push_str(
            "This section is about dosing: keep every dose amount, frequency and \
             timing exactly as written.\n",
        );
    }
    prompt.push_str("\nSECTION TEXT:\n");
    prompt.push_str(content);
    prompt
}

/// First part of a chunked section (2-3 sentences, explicitly partial).
pub fn first_part_prompt(title: &str, part: &str) -> String {
    format!(
        "{PLAIN_LANGUAGE_RULES}\n\n\
         The section \"{title}\" is long, so it arrives in parts. Summarize this \
         FIRST part in 2-3 plain sentences. More text follows, so do not draw \
         final conclusions yet.\n\nPART 1 TEXT:\n{part}"
    )
}

/// Refine the running summary with the next part.
pub fn refine_prompt(title: &str, running_summary: &str, part: &str, is_final: bool) -> String {
    let ask = if is_final {
        "This is the LAST part. Produce the final summary of the whole section in 3-4 plain sentences."
    } else {
        "Produce an updated summary covering everything so far in 3-4 plain sentences."
    };
    format!(
        "{PLAIN_LANGUAGE_RULES}\n\n\
         You are summarizing the leaflet section \"{title}\" incrementally.\n\n\
         SUMMARY SO FAR:\n{running_summary}\n\n\
         NEXT PART TEXT:\n{part}\n\n{ask}"
    )
}

/// Mode-specific refinement of a section the user already has a summary
/// for.
pub fn mode_prompt(title: &str, content: &str, mode: RefinementMode) -> String {
    format!(
        "{PLAIN_LANGUAGE_RULES}\n\n\
         Summarize the leaflet section \"{title}\" below in 3-4 plain sentences.\n\
         {}\n\nSECTION TEXT:\n{content}",
        mode.instruction(),
    )
}

/// Ask for a strict JSON array of medication records from free text.
pub fn medication_list_prompt(free_text: &str) -> String {
    format!(
        "{PLAIN_LANGUAGE_RULES}\n\n\
         Extract every medication mentioned in the text below. Respond with ONLY \
         a JSON array, no prose, where each element is an object with the keys \
         \"name\", \"dosage\" and \"frequency\" (use null when unknown).\n\n\
         TEXT:\n{free_text}"
    )
}
