//! Recurrence label classification.
//!
//! Recurrence labels accumulated synonyms across app versions ("Every Day",
//! "Weekly", canonical raw values). Classification accepts all of them without
//! a migration step and is recomputed on every use.

use serde::{Deserialize, Serialize};

/// How often a goal's target times repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    /// Canonical raw value stored by current app versions.
    pub fn raw_value(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }

    /// Classify a label, falling back to `Daily` when nothing matches.
    ///
    /// Matching is case-sensitive and ordered: "Day", then "Weekly", then
    /// "Monthly" as substrings, then an exact raw value. The fallback
    /// guarantees every goal gets at least a once-a-day reminder.
    pub fn classify(label: &str) -> Frequency {
        if label.contains("Day") {
            return Frequency::Daily;
        }
        if label.contains("Weekly") {
            return Frequency::Weekly;
        }
        if label.contains("Monthly") {
            return Frequency::Monthly;
        }
        Self::ALL
            .into_iter()
            .find(|f| f.raw_value() == label)
            .unwrap_or(Frequency::Daily)
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw_value())
    }
}
