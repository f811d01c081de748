//! Adaptive summarization over a generation oracle.
//!
//! The engine decides how to chunk long section text, drives a
//! sequential refinement conversation with the oracle under timeout and
//! retry discipline, and caches results keyed by content hash. Oracle
//! timeouts and errors are always caught at the call site: where a
//! fallback exists it is taken, and only two hard failures surface —
//! the oracle being unavailable, and the opening generation failing
//! twice in a row.

pub mod chunking;
pub mod engine;
pub mod oracle;
pub mod prompt;
pub mod sanitize;
pub mod store;

pub use engine::{SummaryConfig, SummaryEngine};
pub use oracle::{GenerationOracle, MockOracle, OllamaOracle, OracleError};
pub use store::{CacheStore, MemoryCacheStore};

use base64::Engine as _;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Generation model is not available")]
    OracleUnavailable,

    #[error("Summary generation failed: {0}")]
    GenerationFailed(String),
}

/// SHA-256 digest of section content; the sole cache-invalidation signal.
pub fn content_hash(content: &str) -> String {
    let hash = Sha256::digest(content.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(hash)
}
