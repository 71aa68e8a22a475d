//! Goal storage and persistence.
//!
//! Manages loading and saving goals from a TOML file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::StoreError;
use crate::model::Goal;

/// Storage for user goals
pub struct GoalStore {
    path: PathBuf,
}

/// Wrapper for serializing goals to TOML
#[derive(Serialize, Deserialize, Default)]
struct GoalsFile {
    #[serde(default)]
    goals: Vec<Goal>,
}

impl GoalStore {
    /// Open the goal store in the data directory
    pub fn open(file_name: &str) -> Result<Self, StoreError> {
        let data_dir = data_dir().map_err(|e| StoreError::DataDir(e.to_string()))?;
        Ok(Self {
            path: data_dir.join(file_name),
        })
    }

    /// Create a goal store with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load all goals from storage
    pub fn load_all(&self) -> Result<Vec<Goal>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: GoalsFile = toml::from_str(&content)?;
        Ok(file.goals)
    }

    /// Save all goals to storage
    pub fn save_all(&self, goals: &[Goal]) -> Result<(), StoreError> {
        let file = GoalsFile {
            goals: goals.to_vec(),
        };
        let content = toml::to_string_pretty(&file)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Find a goal by exact id or case-insensitive name
    pub fn find(&self, key: &str) -> Result<Goal, StoreError> {
        self.load_all()?
            .into_iter()
            .find(|g| g.id == key || g.matches_name(key))
            .ok_or_else(|| StoreError::GoalNotFound(key.to_string()))
    }

    /// Insert a goal or replace the one with the same id
    pub fn upsert(&self, goal: Goal) -> Result<(), StoreError> {
        let mut goals = self.load_all()?;
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal,
            None => goals.push(goal),
        }
        self.save_all(&goals)
    }

    /// Remove a goal by id or name, returning it
    pub fn remove(&self, key: &str) -> Result<Goal, StoreError> {
        let mut goals = self.load_all()?;
        let index = goals
            .iter()
            .position(|g| g.id == key || g.matches_name(key))
            .ok_or_else(|| StoreError::GoalNotFound(key.to_string()))?;
        let removed = goals.remove(index);
        self.save_all(&goals)?;
        Ok(removed)
    }
}
