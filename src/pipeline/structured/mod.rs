//! Structured-output recovery for oracle responses.
//!
//! A model asked for a JSON array routinely answers with prose around
//! the array, a truncated tail, or stray trailing commas. The recovery
//! chain never trusts the raw text:
//!
//! 1. slice from the first `[` to the last `]` and parse;
//! 2. failing that, repair the truncated array (cut back to the last
//!    complete object, balance the open braces/brackets) and parse;
//! 3. failing that, regex-scan for individual objects carrying the
//!    required key and parse each one independently.
//!
//! Individual bad records are skipped, never fatal. Duplicates (by
//! natural key, case-insensitively) and blank-keyed records are dropped.

use std::collections::HashSet;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record with a natural key, used for dedup and blank-dropping.
pub trait KeyedRecord {
    fn natural_key(&self) -> &str;
}

/// One medication extracted from free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
}

impl KeyedRecord for MedicationRecord {
    fn natural_key(&self) -> &str {
        &self.name
    }
}

/// Recover a list of records from untrusted oracle output.
///
/// `required_key` is the JSON key every record must carry; it anchors
/// the per-object regex fallback.
pub fn parse_structured_list<T>(raw: &str, required_key: &str) -> Vec<T>
where
    T: DeserializeOwned + KeyedRecord,
{
    let values = extract_array(raw, required_key);

    let mut records = Vec::new();
    let mut seen_keys: HashSet<String> = HashSet::new();
    for value in values {
        let record: T = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("skipping unparseable record: {e}");
                continue;
            }
        };
        let key = record.natural_key().trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        if seen_keys.insert(key) {
            records.push(record);
        }
    }
    records
}

fn extract_array(raw: &str, required_key: &str) -> Vec<serde_json::Value> {
    let Some(start) = raw.find('[') else {
        return recover_objects(raw, required_key);
    };

    // Well-formed case: first `[` through last `]`.
    if let Some(end) = raw.rfind(']') {
        if end > start {
            if let Ok(values) = serde_json::from_str(&raw[start..=end]) {
                return values;
            }
        }
    }

    // Truncated case: repair and re-parse.
    if let Ok(values) = serde_json::from_str(&repair_truncated(&raw[start..])) {
        return values;
    }

    recover_objects(raw, required_key)
}

/// Close an unterminated JSON array: trim the ragged tail back to the
/// last complete object, drop a stray trailing comma, then append one
/// closer for every net-open brace and bracket (braces first).
fn repair_truncated(text: &str) -> String {
    let mut repaired = text.trim_end().to_string();

    // Ends mid-object: cut back to the last `"},"` boundary.
    if !repaired.ends_with('}') && !repaired.ends_with(']') {
        if let Some(pos) = repaired.rfind("},") {
            repaired.truncate(pos + 1);
        }
    }
    while repaired.ends_with(',') {
        repaired.pop();
        repaired.truncate(repaired.trim_end().len());
    }

    let (open_braces, open_brackets) = net_open_delimiters(&repaired);
    for _ in 0..open_braces {
        repaired.push('}');
    }
    for _ in 0..open_brackets {
        repaired.push(']');
    }
    repaired
}

/// Count unbalanced `{` and `[`, ignoring delimiters inside string
/// literals.
fn net_open_delimiters(text: &str) -> (usize, usize) {
    let mut braces: i64 = 0;
    let mut brackets: i64 = 0;
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => braces += 1,
            '}' if !in_string => braces -= 1,
            '[' if !in_string => brackets += 1,
            ']' if !in_string => brackets -= 1,
            _ => {}
        }
    }
    (braces.max(0) as usize, brackets.max(0) as usize)
}

/// Last resort: scan for flat objects that carry the required key and
/// parse each independently, discarding failures.
fn recover_objects(raw: &str, required_key: &str) -> Vec<serde_json::Value> {
    let pattern = format!(
        r#"\{{[^{{}}]*"{}"\s*:\s*"[^"]*"[^{{}}]*\}}"#,
        regex::escape(required_key),
    );
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };

    re.find_iter(raw)
        .filter_map(|m| serde_json::from_str(m.as_str()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Vec<MedicationRecord> {
        parse_structured_list(raw, "name")
    }

    #[test]
    fn well_formed_array_parses_directly() {
        let raw = r#"Here you go:
[{"name":"Metformin","dosage":"500mg","frequency":"twice daily"},
 {"name":"Ibuprofen","dosage":null,"frequency":null}]
Hope that helps!"#;
        let records = parse(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Metformin");
        assert_eq!(records[0].dosage.as_deref(), Some("500mg"));
        assert_eq!(records[1].name, "Ibuprofen");
    }

    #[test]
    fn truncated_array_is_repaired() {
        let raw = r#"[{"name":"A"},{"name":"B""#;
        let records = parse(raw);
        assert!(!records.is_empty());
        assert_eq!(records[0].name, "A");
    }

    #[test]
    fn trailing_comma_before_truncation() {
        let raw = r#"[{"name":"A"},{"name":"B"},"#;
        let records = parse(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "B");
    }

    #[test]
    fn regex_recovery_salvages_broken_output() {
        let raw = r#"I think {"name":"Aspirin","dosage":"100mg"} and also maybe
{"name":"Codeine"} although {{{ this is not json at all"#;
        let records = parse(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Aspirin");
        assert_eq!(records[1].name, "Codeine");
    }

    #[test]
    fn duplicates_dedupe_case_insensitively() {
        let raw = r#"[{"name":"Aspirin"},{"name":"ASPIRIN"},{"name":"Codeine"}]"#;
        let records = parse(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Aspirin");
    }

    #[test]
    fn blank_keys_are_dropped() {
        let raw = r#"[{"name":"  "},{"name":"Aspirin"}]"#;
        let records = parse(raw);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn bad_records_are_skipped_not_fatal() {
        let raw = r#"[{"name":"Aspirin"},{"dosage":"no name here"},{"name":"Codeine"}]"#;
        let records = parse(raw);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn hopeless_input_yields_empty() {
        assert!(parse("no structure here at all").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn brackets_inside_strings_do_not_confuse_the_repair() {
        let raw = r#"[{"name":"A [brand]"},{"name":"B""#;
        let records = parse(raw);
        assert_eq!(records[0].name, "A [brand]");
    }
}
