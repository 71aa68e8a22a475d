use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single logged intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeEntry {
    pub id: String,
    /// Matched against `Goal::name` case-insensitively.
    pub name: String,
    /// Local wall-clock time the intake was logged for.
    pub timestamp: NaiveDateTime,
    /// Whether the logged act satisfied a goal.
    #[serde(default)]
    pub goal_met: bool,
}

impl IntakeEntry {
    pub fn new(name: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            timestamp,
            goal_met: true,
        }
    }
}
