//! SQLite-based intake log.
//!
//! Intake entries are stored with local wall-clock timestamps as
//! `YYYY-MM-DDTHH:MM:SS` text, so lexical order is chronological order.

use std::path::Path;

use chrono::{NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, Row};

use super::{data_dir, IntakeStore};
use crate::error::StoreError;
use crate::model::{names_match, IntakeEntry};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// SQLite database for intake entries.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open `file_name` in the data directory (e.g. `~/.config/dosekeep/dosekeep.db`).
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(file_name: &str) -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::DataDir(e.to_string()))?;
        Self::open_at(&dir.join(file_name))
    }

    /// Open (or create) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entries (
                id        TEXT PRIMARY KEY,
                name      TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                goal_met  INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX IF NOT EXISTS idx_entries_timestamp ON entries(timestamp);",
        )?;
        Ok(())
    }

    /// Record a logged intake.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_entry(&self, entry: &IntakeEntry) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO entries (id, name, timestamp, goal_met) VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.id,
                entry.name,
                entry.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                entry.goal_met,
            ],
        )?;
        Ok(())
    }

    /// Delete a logged intake. Returns whether a row was removed.
    pub fn delete_entry(&self, id: &str) -> Result<bool, StoreError> {
        let n = self.conn.execute("DELETE FROM entries WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    /// Entries logged on the calendar day of `now`, up to `now`.
    pub fn today_entries(&self, now: NaiveDateTime) -> Result<Vec<IntakeEntry>, StoreError> {
        let start = now.date().and_time(NaiveTime::MIN);
        self.query(
            "SELECT id, name, timestamp, goal_met FROM entries
             WHERE timestamp >= ?1 AND timestamp <= ?2
             ORDER BY timestamp",
            params![
                start.format(TIMESTAMP_FORMAT).to_string(),
                now.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )
    }

    fn query(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<IntakeEntry>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, raw_entry)?;

        let mut out = Vec::new();
        for row in rows {
            let (id, name, timestamp, goal_met) = row?;
            let timestamp = NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT)
                .map_err(|_| StoreError::InvalidTimestamp(timestamp.clone()))?;
            out.push(IntakeEntry {
                id,
                name,
                timestamp,
                goal_met,
            });
        }
        Ok(out)
    }
}

fn raw_entry(row: &Row<'_>) -> rusqlite::Result<(String, String, String, bool)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

impl IntakeStore for Database {
    fn entries_for_name(
        &self,
        name: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<IntakeEntry>, StoreError> {
        // SQLite's NOCASE only folds ASCII, so names are matched here.
        let mut entries = self.query(
            "SELECT id, name, timestamp, goal_met FROM entries
             WHERE timestamp >= ?1
             ORDER BY timestamp",
            params![since.format(TIMESTAMP_FORMAT).to_string()],
        )?;
        entries.retain(|e| names_match(&e.name, name));
        Ok(entries)
    }

    fn all_entries(&self) -> Result<Vec<IntakeEntry>, StoreError> {
        self.query(
            "SELECT id, name, timestamp, goal_met FROM entries ORDER BY timestamp",
            params![],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    #[test]
    fn record_and_query_by_name() {
        let db = Database::open_memory().unwrap();
        db.record_entry(&IntakeEntry::new("Vitamin D", at(4, 8, 0))).unwrap();
        db.record_entry(&IntakeEntry::new("vitamin d", at(5, 8, 15))).unwrap();
        db.record_entry(&IntakeEntry::new("Iron", at(5, 9, 0))).unwrap();

        let found = db.entries_for_name("VITAMIN D", at(5, 0, 0)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].timestamp, at(5, 8, 15));
        assert!(found[0].goal_met);

        assert_eq!(db.all_entries().unwrap().len(), 3);
    }

    #[test]
    fn name_match_folds_non_ascii_case() {
        let db = Database::open_memory().unwrap();
        db.record_entry(&IntakeEntry::new("IBUPROFÈNE", at(5, 13, 0))).unwrap();
        db.record_entry(&IntakeEntry::new("Ibuprofen", at(5, 13, 30))).unwrap();

        let found = db.entries_for_name("Ibuprofène", at(5, 0, 0)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "IBUPROFÈNE");
    }

    #[test]
    fn today_entries_stop_at_now() {
        let db = Database::open_memory().unwrap();
        db.record_entry(&IntakeEntry::new("Iron", at(4, 23, 59))).unwrap();
        db.record_entry(&IntakeEntry::new("Iron", at(5, 7, 0))).unwrap();
        db.record_entry(&IntakeEntry::new("Iron", at(5, 19, 0))).unwrap();

        let today = db.today_entries(at(5, 12, 0)).unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].timestamp, at(5, 7, 0));
    }

    #[test]
    fn delete_entry_removes_row() {
        let db = Database::open_memory().unwrap();
        let entry = IntakeEntry::new("Iron", at(5, 7, 0));
        db.record_entry(&entry).unwrap();
        assert!(db.delete_entry(&entry.id).unwrap());
        assert!(!db.delete_entry(&entry.id).unwrap());
        assert!(db.all_entries().unwrap().is_empty());
    }
}
