use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An intake goal, e.g. "Vitamin D, 1000 IU, Daily at 08:00".
///
/// Each target time is a template: only its hour, minute, weekday and
/// day-of-month are meaningful, never the calendar date itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    /// Join key to intake entries (compared case-insensitively).
    pub name: String,
    /// Free-form recurrence label, see [`crate::reminders::Frequency::classify`].
    pub recurrence: String,
    #[serde(default)]
    pub target_times: Vec<NaiveDateTime>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub dosage: f64,
    #[serde(default)]
    pub units: String,
}

fn default_active() -> bool {
    true
}

impl Goal {
    /// Create an active goal with a fresh id and no target times.
    pub fn new(name: impl Into<String>, recurrence: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            recurrence: recurrence.into(),
            target_times: Vec::new(),
            active: true,
            dosage: 0.0,
            units: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_target(mut self, at: NaiveDateTime) -> Self {
        self.target_times.push(at);
        self
    }

    pub fn with_dosage(mut self, dosage: f64, units: impl Into<String>) -> Self {
        self.dosage = dosage;
        self.units = units.into();
        self
    }

    /// Case-insensitive comparison against an intake entry's name.
    pub fn matches_name(&self, other: &str) -> bool {
        super::names_match(&self.name, other)
    }

    /// Whether this goal should produce reminders at all.
    ///
    /// An inactive goal or one without target times gets none.
    pub fn wants_reminders(&self) -> bool {
        self.active && !self.target_times.is_empty()
    }
}
