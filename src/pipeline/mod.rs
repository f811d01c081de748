//! Leaflet processing pipeline.
//!
//! Markup goes through three stages: section extraction splits a leaflet
//! into its numbered sections, content normalization flattens each
//! section's markup into typed blocks, and the summary engine turns
//! section text into cached plain-language summaries.

pub mod content;
pub mod sections;
pub mod structured;
pub mod summary;

#[cfg(test)]
mod tests {
    use crate::pipeline::sections::extract_sections;
    use crate::pipeline::summary::{
        content_hash, CacheStore, MemoryCacheStore, MockOracle, SummaryConfig, SummaryEngine,
    };
    use std::time::Duration;

    fn fast_config() -> SummaryConfig {
        SummaryConfig {
            call_timeout: Duration::from_secs(5),
            inter_call_delay: Duration::from_millis(1),
        }
    }

    fn long_dosage_text(target: usize) -> String {
        let mut text = String::new();
        let mut dose = 1;
        while text.len() < target {
            text.push_str(&format!(
                "Take {dose} tablet with a full glass of water after your morning meal. \
                 Do not exceed the stated dose in any single day. "
            ));
            dose += 1;
        }
        text
    }

    #[tokio::test]
    async fn anchored_leaflet_flows_through_extraction_and_summary() {
        let dosage = long_dosage_text(6200);
        let markup = format!(
            r#"<html><body>
            <h2 id="1">What Leafwex is and what it is used for</h2>
            <p>Leafwex is used for the short-term relief of mild pain.</p>
            <h2 id="2">What you need to know before you take Leafwex</h2>
            <p>Do not take Leafwex if you are allergic to the active substance.</p>
            <h2 id="3">How to take Leafwex</h2>
            <div>{dosage}</div>
            </body></html>"#
        );

        let sections = extract_sections(&markup);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[2].number, 3);
        assert!(sections[2].content.len() > 6000);

        let oracle = MockOracle::new()
            .reply_ok("First part: take one tablet with water.")
            .reply_ok("Refined: take one tablet with water, never exceed the dose.")
            .reply_ok("Final: one tablet with water after meals, never exceed the stated dose.");
        let engine = SummaryEngine::with_config(oracle, MemoryCacheStore::new(), fast_config());

        let summary = engine
            .get_summary("REG-77", 3, &sections[2].title, &sections[2].content)
            .await
            .unwrap();
        assert!(summary.contains("never exceed the stated dose"));

        // 6200 chars lands in the three-part band: one first-part call
        // plus two refinements.
        assert_eq!(engine.oracle().call_count(), 3);

        let cached = engine.cache().get("REG-77", 3).unwrap().unwrap();
        assert_eq!(cached.content_hash, content_hash(&sections[2].content));
        assert_eq!(cached.summary_text, summary);
        assert_eq!(engine.cache().len(), 1);
    }
}
