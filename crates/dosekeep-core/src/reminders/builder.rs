//! Turns a goal into notification trigger specs.
//!
//! One spec per target time. Each spec carries a repeating calendar pattern,
//! so a single submission keeps firing every day, week or month without
//! rescheduling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::frequency::Frequency;
use super::identifier::{encode_slot, Slot};
use super::trigger::{CalendarPattern, NotificationContent, TriggerSpec};
use crate::model::Goal;

pub const DEFAULT_TITLE: &str = "Intake Reminder";
pub const DEFAULT_BODY: &str = "Time to take your {name}";
pub const DEFAULT_CATEGORY: &str = "INTAKE_REMINDER";

/// Metadata keys attached to every reminder.
pub mod metadata_keys {
    pub const GOAL_ID: &str = "goal_id";
    pub const NAME: &str = "name";
    pub const UNITS: &str = "units";
    pub const DOSAGE: &str = "dosage";
    pub const RECURRENCE: &str = "recurrence";
}

/// Display text of generated reminders. `{name}` in the body is replaced
/// with the goal name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderTemplate {
    pub title: String,
    pub body: String,
    pub category: String,
}

impl Default for ReminderTemplate {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            body: DEFAULT_BODY.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Builds trigger specs for goals.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    template: ReminderTemplate,
}

impl ScheduleBuilder {
    pub fn new(template: ReminderTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &ReminderTemplate {
        &self.template
    }

    /// One trigger spec per entry in `goal.target_times`, in order.
    ///
    /// Labels that classify ambiguously fall back to daily reminders.
    pub fn build(&self, goal: &Goal) -> Vec<TriggerSpec> {
        let frequency = Frequency::classify(&goal.recurrence);
        let content = self.content_for(goal);

        goal.target_times
            .iter()
            .map(|at| {
                let slot = Slot::from_time(at, frequency);
                TriggerSpec {
                    identifier: encode_slot(&goal.id, &slot),
                    pattern: pattern_for(&slot),
                    content: content.clone(),
                }
            })
            .collect()
    }

    fn content_for(&self, goal: &Goal) -> NotificationContent {
        let mut metadata = BTreeMap::new();
        metadata.insert(metadata_keys::GOAL_ID.to_string(), goal.id.clone());
        metadata.insert(metadata_keys::NAME.to_string(), goal.name.clone());
        metadata.insert(metadata_keys::UNITS.to_string(), goal.units.clone());
        metadata.insert(metadata_keys::DOSAGE.to_string(), goal.dosage.to_string());
        metadata.insert(metadata_keys::RECURRENCE.to_string(), goal.recurrence.clone());

        NotificationContent {
            title: self.template.title.clone(),
            body: self.template.body.replace("{name}", &goal.name),
            category: self.template.category.clone(),
            metadata,
        }
    }
}

fn pattern_for(slot: &Slot) -> CalendarPattern {
    match (slot.frequency, slot.weekday, slot.day) {
        (Frequency::Weekly, Some(w), _) => CalendarPattern::weekly(w, slot.hour, slot.minute),
        (Frequency::Monthly, _, Some(d)) => CalendarPattern::monthly(d, slot.hour, slot.minute),
        _ => CalendarPattern::daily(slot.hour, slot.minute),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    // 2024-03-05 is a Tuesday.
    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    fn goal(recurrence: &str) -> Goal {
        Goal::new("Vitamin D", recurrence)
            .with_id("g1")
            .with_dosage(1000.0, "IU")
            .with_target(at(8, 0))
            .with_target(at(20, 30))
    }

    #[test]
    fn one_spec_per_target_time() {
        let specs = ScheduleBuilder::default().build(&goal("Daily"));
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].identifier, "reminder-g1-8-0");
        assert_eq!(specs[1].identifier, "reminder-g1-20-30");
        assert_eq!(specs[1].pattern, CalendarPattern::daily(20, 30));
        assert!(specs.iter().all(|s| s.pattern.repeats));
    }

    #[test]
    fn weekly_and_monthly_patterns_carry_extra_field() {
        let weekly = ScheduleBuilder::default().build(&goal("Weekly"));
        assert_eq!(weekly[0].pattern, CalendarPattern::weekly(3, 8, 0));
        assert_eq!(weekly[0].identifier, "reminder-g1-w3-8-0");

        let monthly = ScheduleBuilder::default().build(&goal("Monthly"));
        assert_eq!(monthly[0].pattern, CalendarPattern::monthly(5, 8, 0));
        assert_eq!(monthly[0].identifier, "reminder-g1-d5-8-0");
    }

    #[test]
    fn unknown_label_builds_daily_triggers() {
        let specs = ScheduleBuilder::default().build(&goal("whenever"));
        assert_eq!(specs[0].pattern, CalendarPattern::daily(8, 0));
    }

    #[test]
    fn content_carries_goal_metadata() {
        let specs = ScheduleBuilder::default().build(&goal("Daily"));
        let content = &specs[0].content;
        assert_eq!(content.title, "Intake Reminder");
        assert_eq!(content.body, "Time to take your Vitamin D");
        assert_eq!(content.category, DEFAULT_CATEGORY);
        assert_eq!(content.metadata[metadata_keys::GOAL_ID], "g1");
        assert_eq!(content.metadata[metadata_keys::UNITS], "IU");
        assert_eq!(content.metadata[metadata_keys::DOSAGE], "1000");
        assert_eq!(content.metadata[metadata_keys::RECURRENCE], "Daily");
    }

    #[test]
    fn empty_goal_builds_nothing() {
        let goal = Goal::new("Iron", "Daily");
        assert!(ScheduleBuilder::default().build(&goal).is_empty());
    }
}
