mod config;
pub mod database;
pub mod goals;

pub use config::{AuthorizationConfig, Config, NotificationsConfig, StoreConfig};
pub use database::Database;
pub use goals::GoalStore;

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::error::StoreError;
use crate::model::{names_match, IntakeEntry};

/// Read access to logged intake history.
///
/// Implementations may match names loosely; callers re-check names
/// case-insensitively.
pub trait IntakeStore {
    /// Entries logged for `name` at or after `since`.
    fn entries_for_name(
        &self,
        name: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<IntakeEntry>, StoreError>;

    /// Every logged entry.
    fn all_entries(&self) -> Result<Vec<IntakeEntry>, StoreError>;
}

/// An already-loaded, in-memory view of intake history.
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    entries: Vec<IntakeEntry>,
}

impl HistorySnapshot {
    pub fn new(entries: Vec<IntakeEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: IntakeEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntakeStore for HistorySnapshot {
    fn entries_for_name(
        &self,
        name: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<IntakeEntry>, StoreError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.timestamp >= since && names_match(&e.name, name))
            .cloned()
            .collect())
    }

    fn all_entries(&self) -> Result<Vec<IntakeEntry>, StoreError> {
        Ok(self.entries.clone())
    }
}

impl<S: IntakeStore + ?Sized> IntakeStore for &S {
    fn entries_for_name(
        &self,
        name: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<IntakeEntry>, StoreError> {
        (**self).entries_for_name(name, since)
    }

    fn all_entries(&self) -> Result<Vec<IntakeEntry>, StoreError> {
        (**self).all_entries()
    }
}

/// Returns `~/.config/dosekeep[-dev]/` based on DOSEKEEP_ENV.
///
/// Set DOSEKEEP_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DOSEKEEP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("dosekeep-dev")
    } else {
        base_dir.join("dosekeep")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
