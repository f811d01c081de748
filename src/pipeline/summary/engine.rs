//! The adaptive summarization engine.
//!
//! One logical sequence of oracle calls per request: short sections go
//! through a single call, long sections through a chunked refinement
//! chain where each step feeds the previous step's summary back in.
//! Steps are strictly sequential — a refinement cannot start before the
//! summary it refines exists.

use std::time::Duration;

use tokio::time::timeout;

use crate::config;
use crate::models::{RefinementMode, SummaryCacheEntry};
use crate::pipeline::structured::{parse_structured_list, MedicationRecord};

use super::chunking::{head, part_count, split_into_parts};
use super::oracle::GenerationOracle;
use super::store::CacheStore;
use super::{content_hash, prompt, sanitize, SummaryError};

/// Timing knobs, separated out so tests run in milliseconds.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Per-call timeout; mode refinements get twice this.
    pub call_timeout: Duration,
    /// Pause between consecutive refinement calls.
    pub inter_call_delay: Duration,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(config::CALL_TIMEOUT_SECS),
            inter_call_delay: Duration::from_secs(config::INTER_CALL_DELAY_SECS),
        }
    }
}

pub struct SummaryEngine<O, C> {
    oracle: O,
    cache: C,
    cfg: SummaryConfig,
}

impl<O: GenerationOracle, C: CacheStore> SummaryEngine<O, C> {
    pub fn new(oracle: O, cache: C) -> Self {
        Self::with_config(oracle, cache, SummaryConfig::default())
    }

    pub fn with_config(oracle: O, cache: C, cfg: SummaryConfig) -> Self {
        Self { oracle, cache, cfg }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Get the summary for a section, from cache when the content is
    /// unchanged, freshly generated otherwise.
    pub async fn get_summary(
        &self,
        document_id: &str,
        section_number: u8,
        title: &str,
        content: &str,
    ) -> Result<String, SummaryError> {
        let hash = content_hash(content);

        match self.cache.get(document_id, section_number) {
            Ok(Some(entry)) if entry.content_hash == hash => {
                tracing::debug!(document_id, section_number, "summary cache hit");
                return Ok(entry.summary_text);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("cache lookup failed, regenerating: {e}"),
        }

        if !self.oracle.is_available().await {
            return Err(SummaryError::OracleUnavailable);
        }

        let summary = if content.len() <= config::SINGLE_CALL_MAX_CHARS {
            self.single_call(title, content).await?
        } else {
            self.chunked_refinement(title, content).await?
        };
        if sanitize::is_likely_truncated(&summary) {
            tracing::warn!(document_id, section_number, "summary looks cut off mid-sentence");
        }

        self.persist(document_id, section_number, &hash, &summary);
        Ok(summary)
    }

    /// Regenerate a section's summary with a specific intent. Always
    /// calls the oracle; overwrites the cached entry on success.
    pub async fn refine_summary(
        &self,
        document_id: &str,
        section_number: u8,
        title: &str,
        content: &str,
        mode: RefinementMode,
    ) -> Result<String, SummaryError> {
        if !self.oracle.is_available().await {
            return Err(SummaryError::OracleUnavailable);
        }

        let prompt = prompt::mode_prompt(title, content, mode);
        let raw = self.call_oracle(&prompt, self.cfg.call_timeout * 2).await?;
        let summary = sanitize::strip_markdown(&raw);

        let hash = content_hash(content);
        self.persist(document_id, section_number, &hash, &summary);
        Ok(summary)
    }

    /// Extract medication records from free text via the oracle, running
    /// the structured-output recovery chain over the response.
    pub async fn extract_medications(
        &self,
        free_text: &str,
    ) -> Result<Vec<MedicationRecord>, SummaryError> {
        if !self.oracle.is_available().await {
            return Err(SummaryError::OracleUnavailable);
        }

        let prompt = prompt::medication_list_prompt(free_text);
        let raw = self.call_oracle(&prompt, self.cfg.call_timeout).await?;
        Ok(parse_structured_list(&raw, "name"))
    }

    // ── Internal ────────────────────────────────────────────

    async fn single_call(&self, title: &str, content: &str) -> Result<String, SummaryError> {
        let prompt = prompt::single_summary_prompt(title, content);
        self.call_oracle(&prompt, self.cfg.call_timeout).await
    }

    /// Summarize part 1, then fold each remaining part into the running
    /// summary. A failed first call abandons chunking for one single-shot
    /// retry over the head of the content; a failed refinement step keeps
    /// the previous summary and the chain continues.
    async fn chunked_refinement(&self, title: &str, content: &str) -> Result<String, SummaryError> {
        let parts = split_into_parts(content, part_count(content.len()));
        let total = parts.len();
        tracing::debug!(total, len = content.len(), "chunked summarization");

        let first_prompt = prompt::first_part_prompt(title, parts[0]);
        let mut running = match self.call_oracle(&first_prompt, self.cfg.call_timeout).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("first-part generation failed ({e}), retrying single-shot");
                return self
                    .single_call(title, head(content, config::SINGLE_CALL_MAX_CHARS))
                    .await;
            }
        };

        for (i, part) in parts.iter().enumerate().skip(1) {
            tokio::time::sleep(self.cfg.inter_call_delay).await;
            let is_final = i + 1 == total;
            let prompt = prompt::refine_prompt(title, &running, part, is_final);
            match self.call_oracle(&prompt, self.cfg.call_timeout).await {
                Ok(updated) => running = updated,
                Err(e) => {
                    tracing::warn!(step = i + 1, "refinement step failed ({e}), keeping previous summary");
                }
            }
        }

        Ok(running)
    }

    async fn call_oracle(&self, prompt: &str, limit: Duration) -> Result<String, SummaryError> {
        match timeout(limit, self.oracle.generate(prompt)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(SummaryError::GenerationFailed(e.to_string())),
            Err(_) => Err(SummaryError::GenerationFailed(format!(
                "timed out after {}s",
                limit.as_secs(),
            ))),
        }
    }

    /// Overwrite the cache entry. A write failure loses only the cache,
    /// not the freshly generated summary.
    fn persist(&self, document_id: &str, section_number: u8, hash: &str, summary: &str) {
        let entry = SummaryCacheEntry {
            document_id: document_id.to_string(),
            section_number,
            content_hash: hash.to_string(),
            summary_text: summary.to_string(),
            created_at: chrono::Local::now().naive_local(),
        };
        if let Err(e) = self.cache.put(&entry) {
            tracing::warn!("failed to cache summary: {e}");
        } else {
            tracing::debug!(document_id, section_number, "summary cached");
        }
    }
}
