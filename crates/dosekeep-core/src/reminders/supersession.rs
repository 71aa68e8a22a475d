//! Retracts pending triggers made redundant by a later slot.
//!
//! When a goal's reminder for a cycle moves later (or a later reminder of the
//! same cycle is being delivered), a still-pending trigger for an earlier time
//! would remind the user twice for the same logical slot.

use chrono::{NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

use super::trigger::{hour_minute, PendingTrigger, TriggerPattern};
use crate::error::ReminderError;

pub struct SupersessionResolver;

impl SupersessionResolver {
    /// Identifiers among `pending` whose next firing falls at an earlier
    /// hour and minute than `current`.
    ///
    /// `pending` should already be narrowed to one goal. Next firings are
    /// computed from the start of `current`'s day. Triggers without a
    /// readable calendar pattern are never selected.
    pub fn resolve(pending: &[PendingTrigger], current: NaiveDateTime) -> Vec<String> {
        let reference = current.date().and_time(NaiveTime::MIN);
        let current_slot = hour_minute(&current);

        pending
            .iter()
            .filter_map(|trigger| match next_firing(trigger, reference) {
                Ok(next) => Some((trigger, next)),
                Err(e) => {
                    warn!("skipping pending trigger: {e}");
                    None
                }
            })
            .filter(|(_, next)| hour_minute(next) < current_slot)
            .map(|(trigger, next)| {
                debug!(identifier = %trigger.identifier, %next, "superseded");
                trigger.identifier.clone()
            })
            .collect()
    }
}

fn next_firing(
    trigger: &PendingTrigger,
    from: NaiveDateTime,
) -> Result<NaiveDateTime, ReminderError> {
    let malformed = |reason: String| ReminderError::MalformedTriggerPattern {
        identifier: trigger.identifier.clone(),
        reason,
    };
    match &trigger.pattern {
        TriggerPattern::Calendar(pattern) => pattern.next_occurrence(from).map_err(malformed),
        TriggerPattern::Interval { .. } => Err(malformed("not a calendar trigger".to_string())),
        TriggerPattern::Unknown => Err(malformed("unreadable trigger".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminders::trigger::CalendarPattern;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    fn daily(identifier: &str, h: u32, m: u32) -> PendingTrigger {
        PendingTrigger {
            identifier: identifier.to_string(),
            pattern: TriggerPattern::Calendar(CalendarPattern::daily(h, m)),
        }
    }

    #[test]
    fn earlier_slot_is_superseded() {
        let pending = vec![daily("reminder-g1-8-0", 8, 0), daily("reminder-g1-14-0", 14, 0)];
        assert_eq!(
            SupersessionResolver::resolve(&pending, at(14, 0)),
            vec!["reminder-g1-8-0".to_string()]
        );
    }

    #[test]
    fn nothing_earlier_than_first_slot() {
        let pending = vec![daily("reminder-g1-8-0", 8, 0), daily("reminder-g1-14-0", 14, 0)];
        assert!(SupersessionResolver::resolve(&pending, at(7, 0)).is_empty());
    }

    #[test]
    fn minute_breaks_ties_within_hour() {
        let pending = vec![daily("reminder-g1-8-15", 8, 15), daily("reminder-g1-8-45", 8, 45)];
        assert_eq!(
            SupersessionResolver::resolve(&pending, at(8, 30)),
            vec!["reminder-g1-8-15".to_string()]
        );
    }

    #[test]
    fn non_calendar_and_malformed_patterns_are_skipped() {
        let pending = vec![
            PendingTrigger {
                identifier: "interval".into(),
                pattern: TriggerPattern::Interval { seconds: 60, repeats: true },
            },
            PendingTrigger {
                identifier: "unknown".into(),
                pattern: TriggerPattern::Unknown,
            },
            PendingTrigger {
                identifier: "bad-hour".into(),
                pattern: TriggerPattern::Calendar(CalendarPattern::daily(25, 0)),
            },
        ];
        assert!(SupersessionResolver::resolve(&pending, at(23, 59)).is_empty());
    }

    #[test]
    fn weekly_trigger_uses_its_next_occurrence() {
        let pending = vec![PendingTrigger {
            identifier: "reminder-g1-w6-9-0".into(),
            pattern: TriggerPattern::Calendar(CalendarPattern::weekly(6, 9, 0)),
        }];
        assert_eq!(SupersessionResolver::resolve(&pending, at(10, 0)).len(), 1);
        assert!(SupersessionResolver::resolve(&pending, at(9, 0)).is_empty());
    }
}
