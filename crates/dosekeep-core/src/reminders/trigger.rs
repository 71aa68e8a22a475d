//! Notification trigger definitions.
//!
//! A [`TriggerSpec`] is what the engine hands to the notification gateway; a
//! [`PendingTrigger`] is what the gateway reports back. Neither is persisted
//! by the engine: the OS notification store is the durable copy.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Days searched ahead for the next calendar match. A day-of-month of 31 is
/// at most two months away.
const SEARCH_HORIZON_DAYS: i64 = 400;

/// A repeating calendar match in the style of OS date-component triggers.
///
/// Unset fields match any value. Weekday follows the platform convention,
/// 1=Sunday..7=Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(default)]
    pub repeats: bool,
}

impl CalendarPattern {
    /// Repeating daily match at `hour:minute`.
    pub fn daily(hour: u32, minute: u32) -> Self {
        Self {
            hour: Some(hour),
            minute: Some(minute),
            weekday: None,
            day: None,
            repeats: true,
        }
    }

    pub fn weekly(weekday: u32, hour: u32, minute: u32) -> Self {
        Self {
            weekday: Some(weekday),
            ..Self::daily(hour, minute)
        }
    }

    pub fn monthly(day: u32, hour: u32, minute: u32) -> Self {
        Self {
            day: Some(day),
            ..Self::daily(hour, minute)
        }
    }

    /// Reject out-of-range fields.
    pub fn validate(&self) -> Result<(), String> {
        check_range("hour", self.hour, 0, 23)?;
        check_range("minute", self.minute, 0, 59)?;
        check_range("weekday", self.weekday, 1, 7)?;
        check_range("day", self.day, 1, 31)?;
        Ok(())
    }

    /// Earliest minute at or after `from` matching this pattern.
    pub fn next_occurrence(&self, from: NaiveDateTime) -> Result<NaiveDateTime, String> {
        self.validate()?;

        let hours: Vec<u32> = self.hour.map(|h| vec![h]).unwrap_or_else(|| (0..24).collect());
        let minutes: Vec<u32> = self.minute.map(|m| vec![m]).unwrap_or_else(|| (0..60).collect());

        for offset in 0..=SEARCH_HORIZON_DAYS {
            let date = from.date() + Duration::days(offset);
            if !self.matches_date(date) {
                continue;
            }
            for &h in &hours {
                for &m in &minutes {
                    let Some(time) = NaiveTime::from_hms_opt(h, m, 0) else {
                        continue;
                    };
                    let candidate = date.and_time(time);
                    if candidate >= from {
                        return Ok(candidate);
                    }
                }
            }
        }
        Err(format!("no match within {SEARCH_HORIZON_DAYS} days"))
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        self.weekday
            .map_or(true, |w| date.weekday().number_from_sunday() == w)
            && self.day.map_or(true, |d| date.day() == d)
    }
}

fn check_range(field: &str, value: Option<u32>, min: u32, max: u32) -> Result<(), String> {
    match value {
        Some(v) if v < min || v > max => Err(format!("{field} {v} outside {min}..={max}")),
        _ => Ok(()),
    }
}

/// The trigger of a pending notification as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerPattern {
    Calendar(CalendarPattern),
    Interval { seconds: u64, repeats: bool },
    /// Anything the gateway could not describe.
    Unknown,
}

/// Display payload of a reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub category: String,
    /// Lets an action handler log intake without re-querying the goal store.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// One notification request for the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub identifier: String,
    pub pattern: CalendarPattern,
    pub content: NotificationContent,
}

/// A notification the gateway still has queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTrigger {
    pub identifier: String,
    pub pattern: TriggerPattern,
}

impl From<&TriggerSpec> for PendingTrigger {
    fn from(spec: &TriggerSpec) -> Self {
        Self {
            identifier: spec.identifier.clone(),
            pattern: TriggerPattern::Calendar(spec.pattern),
        }
    }
}

/// A button shown on a delivered reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub id: String,
    pub title: String,
}

/// Named group of actions a reminder can reference by `category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationCategory {
    pub id: String,
    pub actions: Vec<NotificationAction>,
}

pub const LOG_INTAKE_ACTION: &str = "LOG_INTAKE";
pub const SNOOZE_ACTION: &str = "SNOOZE";

impl NotificationCategory {
    /// The intake reminder category: log the intake or snooze.
    pub fn intake_reminder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            actions: vec![
                NotificationAction {
                    id: LOG_INTAKE_ACTION.to_string(),
                    title: "Log Intake".to_string(),
                },
                NotificationAction {
                    id: SNOOZE_ACTION.to_string(),
                    title: "Snooze".to_string(),
                },
            ],
        }
    }
}

/// Convenience for reading `hour:minute` off any timestamp.
pub(crate) fn hour_minute(at: &NaiveDateTime) -> (u32, u32) {
    (at.hour(), at.minute())
}
