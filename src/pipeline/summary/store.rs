//! Summary cache abstraction.
//!
//! The engine only ever talks to a [`CacheStore`]; the SQLite-backed
//! implementation lives in `db::repository::summary_cache`, and the
//! in-process [`MemoryCacheStore`] backs tests. Concurrent writers for
//! the same key race last-writer-wins: both store a valid hash/summary
//! pair for the same content, so the cache stays correct either way.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDateTime;

use crate::db::DatabaseError;
use crate::models::SummaryCacheEntry;

/// Keyed persistent store for section summaries.
pub trait CacheStore {
    fn get(
        &self,
        document_id: &str,
        section_number: u8,
    ) -> Result<Option<SummaryCacheEntry>, DatabaseError>;

    /// Insert or overwrite the entry for the entry's key.
    fn put(&self, entry: &SummaryCacheEntry) -> Result<(), DatabaseError>;

    fn delete_section(&self, document_id: &str, section_number: u8) -> Result<(), DatabaseError>;

    fn delete_document(&self, document_id: &str) -> Result<(), DatabaseError>;

    /// Remove entries created before `cutoff`; returns how many went.
    fn delete_expired(&self, cutoff: NaiveDateTime) -> Result<u64, DatabaseError>;

    fn clear_all(&self) -> Result<(), DatabaseError>;
}

/// In-memory cache store for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<(String, u8), SummaryCacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(
        &self,
        document_id: &str,
        section_number: u8,
    ) -> Result<Option<SummaryCacheEntry>, DatabaseError> {
        let entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(entries.get(&(document_id.to_string(), section_number)).cloned())
    }

    fn put(&self, entry: &SummaryCacheEntry) -> Result<(), DatabaseError> {
        let mut entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        entries.insert(
            (entry.document_id.clone(), entry.section_number),
            entry.clone(),
        );
        Ok(())
    }

    fn delete_section(&self, document_id: &str, section_number: u8) -> Result<(), DatabaseError> {
        let mut entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        entries.remove(&(document_id.to_string(), section_number));
        Ok(())
    }

    fn delete_document(&self, document_id: &str) -> Result<(), DatabaseError> {
        let mut entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        entries.retain(|(doc, _), _| doc != document_id);
        Ok(())
    }

    fn delete_expired(&self, cutoff: NaiveDateTime) -> Result<u64, DatabaseError> {
        let mut entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        let before = entries.len();
        entries.retain(|_, entry| entry.created_at >= cutoff);
        Ok((before - entries.len()) as u64)
    }

    fn clear_all(&self) -> Result<(), DatabaseError> {
        let mut entries = self.entries.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        entries.clear();
        Ok(())
    }
}
