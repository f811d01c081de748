//! Leafwise — leaflet section extraction, content normalization, and
//! adaptive summarization over a local generation model.
//!
//! Three cooperating stages:
//! - `pipeline::sections` recovers a leaflet's numbered section structure
//!   from inconsistently authored markup (three fallback strategies).
//! - `pipeline::content` flattens arbitrary nested markup into typed,
//!   display-ready content blocks, including pseudo-list detection.
//! - `pipeline::summary` drives a chunked, iterative summarization
//!   conversation with a generation oracle under timeout/retry
//!   discipline, caching results by content hash.
//!
//! Parsing stages never fail past their boundary — they degrade to less
//! structure. Only the summarizer surfaces typed failures.

pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;

pub use models::{ContentBlock, RefinementMode, Section, SummaryCacheEntry};
pub use pipeline::content::normalize_to_blocks;
pub use pipeline::sections::extract_sections;
pub use pipeline::structured::{parse_structured_list, KeyedRecord, MedicationRecord};
pub use pipeline::summary::{
    CacheStore, GenerationOracle, SummaryEngine, SummaryError,
};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and integration tests.
///
/// Honors `RUST_LOG`; falls back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
