use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A cached section summary, keyed by `(document_id, section_number)`.
///
/// `content_hash` is a digest of the exact section content that produced
/// the summary and is the sole invalidation signal — no explicit version
/// column. An entry is valid for a content string iff the content hashes
/// to `content_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryCacheEntry {
    /// Stable document identifier (e.g. a registration number).
    pub document_id: String,
    pub section_number: u8,
    pub content_hash: String,
    pub summary_text: String,
    pub created_at: NaiveDateTime,
}

/// A named refinement intent.
///
/// Changes the prompt sent to the oracle; does not change caching
/// semantics beyond overwriting the existing entry for the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementMode {
    Regenerate,
    MoreDetail,
    Simpler,
    FocusDosage,
    ForChild,
    ForElderly,
    SeriousEffectsOnly,
    AllEffects,
    AlcoholInteraction,
    PregnancyInteraction,
}

impl RefinementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regenerate => "regenerate",
            Self::MoreDetail => "more_detail",
            Self::Simpler => "simpler",
            Self::FocusDosage => "focus_dosage",
            Self::ForChild => "for_child",
            Self::ForElderly => "for_elderly",
            Self::SeriousEffectsOnly => "serious_effects_only",
            Self::AllEffects => "all_effects",
            Self::AlcoholInteraction => "alcohol_interaction",
            Self::PregnancyInteraction => "pregnancy_interaction",
        }
    }

    /// The instruction substituted into the shared refinement prompt.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Regenerate => "Write a fresh summary of this section.",
            Self::MoreDetail => {
                "Expand the summary with more detail, keeping it understandable for a layperson."
            }
            Self::Simpler => {
                "Rewrite the summary in the simplest possible language, short sentences only."
            }
            Self::FocusDosage => {
                "Focus on dosage: how much to take, how often, and what to do about a missed dose."
            }
            Self::ForChild => {
                "Focus on what applies to children: permitted ages, child doses, and warnings."
            }
            Self::ForElderly => {
                "Focus on what applies to elderly patients: adjusted doses and age-related warnings."
            }
            Self::SeriousEffectsOnly => {
                "List only the serious side effects that require contacting a doctor."
            }
            Self::AllEffects => {
                "Cover all mentioned side effects, grouped from common to rare."
            }
            Self::AlcoholInteraction => {
                "Focus on what this section says about combining the medicine with alcohol."
            }
            Self::PregnancyInteraction => {
                "Focus on what this section says about pregnancy and breastfeeding."
            }
        }
    }
}

impl std::fmt::Display for RefinementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serializes_snake_case() {
        let json = serde_json::to_string(&RefinementMode::FocusDosage).unwrap();
        assert_eq!(json, "\"focus_dosage\"");
    }

    #[test]
    fn every_mode_has_an_instruction() {
        let modes = [
            RefinementMode::Regenerate,
            RefinementMode::MoreDetail,
            RefinementMode::Simpler,
            RefinementMode::FocusDosage,
            RefinementMode::ForChild,
            RefinementMode::ForElderly,
            RefinementMode::SeriousEffectsOnly,
            RefinementMode::AllEffects,
            RefinementMode::AlcoholInteraction,
            RefinementMode::PregnancyInteraction,
        ];
        for mode in modes {
            assert!(!mode.instruction().is_empty());
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }
}
