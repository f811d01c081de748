/// Application-level constants
pub const APP_NAME: &str = "Leafwise";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `RUST_LOG`-style filter when the environment does not set one.
pub fn default_log_filter() -> String {
    "leafwise=info".to_string()
}

// ── Summarization thresholds ────────────────────────────────────────────────

/// Sections at or below this length are summarized with a single oracle call.
pub const SINGLE_CALL_MAX_CHARS: usize = 2500;

/// Chunked sections at or below this length use 2 parts.
pub const TWO_PART_MAX_CHARS: usize = 5000;

/// Chunked sections at or below this length use 3 parts.
pub const THREE_PART_MAX_CHARS: usize = 8000;

/// Hard cap on part count for any section.
pub const MAX_PARTS: usize = 4;

/// How far (in chars) a split point may slide to reach a sentence boundary.
pub const BOUNDARY_WINDOW_CHARS: usize = 200;

// ── Oracle discipline ───────────────────────────────────────────────────────

/// Per-call timeout for summary generation.
pub const CALL_TIMEOUT_SECS: u64 = 20;

/// Delay between consecutive refinement calls. The local model serves one
/// request at a time; back-to-back calls degrade every caller.
pub const INTER_CALL_DELAY_SECS: u64 = 2;

/// Default local Ollama endpoint.
pub const DEFAULT_ORACLE_URL: &str = "http://localhost:11434";

/// Preferred generation models in order of preference.
pub const MODEL_PREFERENCES: &[&str] = &[
    "medgemma",
    "medgemma:4b",
    "medgemma:latest",
    "gemma3",
    "llama3",
];

// ── Cache lifecycle ─────────────────────────────────────────────────────────

/// Cached summaries older than this are removed by the expiry sweep.
pub const CACHE_TTL_DAYS: i64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_leafwise() {
        assert_eq!(APP_NAME, "Leafwise");
    }

    #[test]
    fn chunk_thresholds_are_ordered() {
        assert!(SINGLE_CALL_MAX_CHARS < TWO_PART_MAX_CHARS);
        assert!(TWO_PART_MAX_CHARS < THREE_PART_MAX_CHARS);
        assert_eq!(MAX_PARTS, 4);
    }

    #[test]
    fn model_preference_list_non_empty() {
        assert!(!MODEL_PREFERENCES.is_empty());
        assert_eq!(MODEL_PREFERENCES[0], "medgemma");
    }
}
