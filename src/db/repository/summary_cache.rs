use std::sync::Mutex;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::SummaryCacheEntry;
use crate::pipeline::summary::CacheStore;

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Insert or replace the cached summary for `(document_id, section_number)`.
pub fn upsert_summary(conn: &Connection, entry: &SummaryCacheEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO summary_cache (document_id, section_number, content_hash, summary_text, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(document_id, section_number) DO UPDATE SET
           content_hash = excluded.content_hash,
           summary_text = excluded.summary_text,
           created_at = excluded.created_at",
        params![
            entry.document_id,
            entry.section_number,
            entry.content_hash,
            entry.summary_text,
            entry.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

/// Get the cached summary for a section, if any.
pub fn get_summary(
    conn: &Connection,
    document_id: &str,
    section_number: u8,
) -> Result<Option<SummaryCacheEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT document_id, section_number, content_hash, summary_text, created_at
         FROM summary_cache
         WHERE document_id = ?1 AND section_number = ?2
         LIMIT 1",
    )?;
    let mut rows = stmt.query_map(params![document_id, section_number], row_to_entry)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

/// Invalidate one section's cached summary.
pub fn delete_section_summary(
    conn: &Connection,
    document_id: &str,
    section_number: u8,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM summary_cache WHERE document_id = ?1 AND section_number = ?2",
        params![document_id, section_number],
    )?;
    Ok(())
}

/// Drop every cached summary for a document.
pub fn delete_document_summaries(
    conn: &Connection,
    document_id: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM summary_cache WHERE document_id = ?1",
        params![document_id],
    )?;
    Ok(())
}

/// Expiry sweep: remove entries created before `cutoff`.
pub fn delete_expired_summaries(
    conn: &Connection,
    cutoff: NaiveDateTime,
) -> Result<u64, DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM summary_cache WHERE created_at < ?1",
        params![cutoff.format(DATETIME_FMT).to_string()],
    )?;
    Ok(affected as u64)
}

/// Wipe the whole cache.
pub fn clear_summaries(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM summary_cache", [])?;
    Ok(())
}

fn row_to_entry(row: &rusqlite::Row) -> Result<SummaryCacheEntry, rusqlite::Error> {
    let section_number: i64 = row.get(1)?;
    let created_str: String = row.get(4)?;

    Ok(SummaryCacheEntry {
        document_id: row.get(0)?,
        section_number: section_number as u8,
        content_hash: row.get(2)?,
        summary_text: row.get(3)?,
        created_at: NaiveDateTime::parse_from_str(&created_str, DATETIME_FMT).unwrap_or_default(),
    })
}

/// [`CacheStore`] over a SQLite connection, shareable across callers.
pub struct SqliteCacheStore {
    conn: Mutex<Connection>,
}

impl SqliteCacheStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&conn)
    }
}

impl CacheStore for SqliteCacheStore {
    fn get(
        &self,
        document_id: &str,
        section_number: u8,
    ) -> Result<Option<SummaryCacheEntry>, DatabaseError> {
        self.with_conn(|conn| get_summary(conn, document_id, section_number))
    }

    fn put(&self, entry: &SummaryCacheEntry) -> Result<(), DatabaseError> {
        self.with_conn(|conn| upsert_summary(conn, entry))
    }

    fn delete_section(&self, document_id: &str, section_number: u8) -> Result<(), DatabaseError> {
        self.with_conn(|conn| delete_section_summary(conn, document_id, section_number))
    }

    fn delete_document(&self, document_id: &str) -> Result<(), DatabaseError> {
        self.with_conn(|conn| delete_document_summaries(conn, document_id))
    }

    fn delete_expired(&self, cutoff: NaiveDateTime) -> Result<u64, DatabaseError> {
        self.with_conn(|conn| delete_expired_summaries(conn, cutoff))
    }

    fn clear_all(&self) -> Result<(), DatabaseError> {
        self.with_conn(clear_summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::pipeline::summary::content_hash;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn make_entry(document_id: &str, section_number: u8, content: &str) -> SummaryCacheEntry {
        SummaryCacheEntry {
            document_id: document_id.to_string(),
            section_number,
            content_hash: content_hash(content),
            summary_text: format!("Plain-language summary of: {content}"),
            created_at: chrono::Local::now().naive_local(),
        }
    }

    #[test]
    fn insert_and_retrieve() {
        let conn = test_db();
        upsert_summary(&conn, &make_entry("REG-12345", 3, "One tablet daily.")).unwrap();

        let entry = get_summary(&conn, "REG-12345", 3).unwrap().unwrap();
        assert_eq!(entry.content_hash, content_hash("One tablet daily."));
        assert!(entry.summary_text.contains("One tablet daily."));
    }

    #[test]
    fn missing_returns_none() {
        let conn = test_db();
        assert!(get_summary(&conn, "REG-0", 1).unwrap().is_none());
    }

    #[test]
    fn upsert_replaces_existing() {
        let conn = test_db();
        upsert_summary(&conn, &make_entry("REG-1", 3, "old content")).unwrap();
        upsert_summary(&conn, &make_entry("REG-1", 3, "new content")).unwrap();

        let entry = get_summary(&conn, "REG-1", 3).unwrap().unwrap();
        assert_eq!(entry.content_hash, content_hash("new content"));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM summary_cache", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn delete_section_is_targeted() {
        let conn = test_db();
        upsert_summary(&conn, &make_entry("REG-1", 3, "a")).unwrap();
        upsert_summary(&conn, &make_entry("REG-1", 4, "b")).unwrap();

        delete_section_summary(&conn, "REG-1", 3).unwrap();
        assert!(get_summary(&conn, "REG-1", 3).unwrap().is_none());
        assert!(get_summary(&conn, "REG-1", 4).unwrap().is_some());
    }

    #[test]
    fn delete_document_removes_all_sections() {
        let conn = test_db();
        upsert_summary(&conn, &make_entry("REG-1", 1, "a")).unwrap();
        upsert_summary(&conn, &make_entry("REG-1", 2, "b")).unwrap();
        upsert_summary(&conn, &make_entry("REG-2", 1, "c")).unwrap();

        delete_document_summaries(&conn, "REG-1").unwrap();
        assert!(get_summary(&conn, "REG-1", 1).unwrap().is_none());
        assert!(get_summary(&conn, "REG-2", 1).unwrap().is_some());
    }

    #[test]
    fn expiry_sweep_by_cutoff() {
        let conn = test_db();
        let mut old = make_entry("REG-1", 1, "stale");
        old.created_at = chrono::Local::now().naive_local() - chrono::Duration::days(45);
        upsert_summary(&conn, &old).unwrap();
        upsert_summary(&conn, &make_entry("REG-1", 2, "fresh")).unwrap();

        let cutoff = chrono::Local::now().naive_local() - chrono::Duration::days(30);
        let removed = delete_expired_summaries(&conn, cutoff).unwrap();
        assert_eq!(removed, 1);
        assert!(get_summary(&conn, "REG-1", 1).unwrap().is_none());
    }

    #[test]
    fn clear_all_empties_the_cache() {
        let conn = test_db();
        upsert_summary(&conn, &make_entry("REG-1", 1, "a")).unwrap();
        upsert_summary(&conn, &make_entry("REG-2", 2, "b")).unwrap();

        clear_summaries(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM summary_cache", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn sqlite_store_implements_cache_store() {
        let store = SqliteCacheStore::new(test_db());
        let entry = make_entry("REG-9", 5, "Keep below 25 degrees.");
        store.put(&entry).unwrap();

        let found = store.get("REG-9", 5).unwrap().unwrap();
        assert_eq!(found.summary_text, entry.summary_text);

        store.delete_section("REG-9", 5).unwrap();
        assert!(store.get("REG-9", 5).unwrap().is_none());
    }
}
