//! Decides whether a due reminder should be withheld.
//!
//! A reminder is withheld when the user already logged the intake for the
//! slot it belongs to: an entry for the goal on the slot's day (today, the
//! same weekday this week, or the same day-of-month this month) at or before
//! the slot's hour and minute.
//!
//! Evaluation reads history fresh on every call. An unreadable store resolves
//! to "deliver the reminder". Labels classify exactly as they do for
//! scheduling, so a goal is suppressed on the same cycle it is reminded on.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

use super::frequency::Frequency;
use super::trigger::hour_minute;
use crate::model::{Goal, IntakeEntry};
use crate::storage::IntakeStore;

/// Suppression check against an explicit "now".
#[derive(Debug, Clone, Copy)]
pub struct SuppressionEvaluator {
    now: NaiveDateTime,
}

impl SuppressionEvaluator {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Whether the reminder for `goal` due at `scheduled` should be withheld.
    pub fn should_suppress<S: IntakeStore + ?Sized>(
        &self,
        goal: &Goal,
        scheduled: NaiveDateTime,
        store: &S,
    ) -> bool {
        let frequency = Frequency::classify(&goal.recurrence);

        let since = self.window_start(frequency);
        let entries = match store.entries_for_name(&goal.name, since) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(goal = %goal.id, "intake history unavailable, not suppressing: {e}");
                return false;
            }
        };

        let slot = hour_minute(&scheduled);
        let suppress = entries
            .iter()
            .filter(|e| goal.matches_name(&e.name))
            .filter(|e| e.timestamp >= since && e.timestamp <= self.now)
            .filter(|e| self.in_slot_day(e, frequency, scheduled))
            .any(|e| hour_minute(&e.timestamp) <= slot);

        debug!(goal = %goal.id, %frequency, %scheduled, suppress, "suppression evaluated");
        suppress
    }

    /// Earliest timestamp that can count for the current cycle.
    fn window_start(&self, frequency: Frequency) -> NaiveDateTime {
        let date = match frequency {
            Frequency::Daily => self.now.date(),
            Frequency::Weekly => week_start(self.now.date()),
            Frequency::Monthly => self.now.date().with_day(1).unwrap_or(self.now.date()),
        };
        date.and_time(NaiveTime::MIN)
    }

    fn in_slot_day(
        &self,
        entry: &IntakeEntry,
        frequency: Frequency,
        scheduled: NaiveDateTime,
    ) -> bool {
        let day = entry.timestamp.date();
        let today = self.now.date();
        match frequency {
            Frequency::Daily => day == today,
            Frequency::Weekly => {
                day.weekday() == scheduled.weekday() && week_start(day) == week_start(today)
            }
            Frequency::Monthly => {
                day.day() == scheduled.day()
                    && day.month() == today.month()
                    && day.year() == today.year()
            }
        }
    }
}

/// The Sunday starting the calendar week of `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::storage::HistorySnapshot;

    // March 2024: the 3rd is a Sunday, the 5th a Tuesday.
    fn dt(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    fn goal(name: &str, recurrence: &str) -> Goal {
        Goal::new(name, recurrence).with_id("g1")
    }

    fn history(entries: &[(&str, NaiveDateTime)]) -> HistorySnapshot {
        HistorySnapshot::new(
            entries
                .iter()
                .map(|(name, at)| IntakeEntry::new(*name, *at))
                .collect(),
        )
    }

    #[test]
    fn daily_earlier_entry_today_suppresses() {
        let eval = SuppressionEvaluator::new(dt(5, 14, 0));
        let store = history(&[("Daily Med", dt(5, 13, 0))]);
        assert!(eval.should_suppress(&goal("Daily Med", "Daily"), dt(5, 14, 0), &store));
    }

    #[test]
    fn daily_later_entry_does_not_suppress() {
        let eval = SuppressionEvaluator::new(dt(5, 16, 0));
        let store = history(&[("Daily Med", dt(5, 15, 0))]);
        assert!(!eval.should_suppress(&goal("Daily Med", "Daily"), dt(5, 14, 0), &store));
    }

    #[test]
    fn daily_same_minute_suppresses() {
        let eval = SuppressionEvaluator::new(dt(5, 14, 30));
        let store = history(&[("Daily Med", dt(5, 14, 0))]);
        assert!(eval.should_suppress(&goal("Daily Med", "Daily"), dt(5, 14, 0), &store));
    }

    #[test]
    fn daily_yesterday_does_not_count() {
        let eval = SuppressionEvaluator::new(dt(5, 14, 0));
        let store = history(&[("Daily Med", dt(4, 9, 0))]);
        assert!(!eval.should_suppress(&goal("Daily Med", "Daily"), dt(5, 14, 0), &store));
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let eval = SuppressionEvaluator::new(dt(5, 14, 0));
        let store = history(&[("daily med", dt(5, 8, 0))]);
        assert!(eval.should_suppress(&goal("Daily Med", "Daily"), dt(5, 14, 0), &store));
    }

    #[test]
    fn other_names_never_suppress() {
        let eval = SuppressionEvaluator::new(dt(5, 14, 0));
        let store = history(&[("Iron", dt(5, 8, 0))]);
        assert!(!eval.should_suppress(&goal("Daily Med", "Daily"), dt(5, 14, 0), &store));
    }

    #[test]
    fn empty_history_never_suppresses() {
        let eval = SuppressionEvaluator::new(dt(5, 14, 0));
        let store = HistorySnapshot::default();
        for label in ["Daily", "Weekly", "Monthly"] {
            assert!(!eval.should_suppress(&goal("Daily Med", label), dt(5, 14, 0), &store));
        }
    }

    #[test]
    fn weekly_same_weekday_suppresses() {
        let eval = SuppressionEvaluator::new(dt(5, 10, 0));
        let store = history(&[("Weekly Med", dt(5, 9, 0))]);
        assert!(eval.should_suppress(&goal("Weekly Med", "Weekly"), dt(5, 10, 0), &store));
    }

    #[test]
    fn weekly_other_weekday_does_not_suppress() {
        let eval = SuppressionEvaluator::new(dt(5, 10, 0));
        let store = history(&[("Weekly Med", dt(4, 9, 0))]);
        assert!(!eval.should_suppress(&goal("Weekly Med", "Weekly"), dt(5, 10, 0), &store));
    }

    #[test]
    fn weekly_previous_week_does_not_count() {
        // Tuesday 27 February is the same weekday, one week earlier.
        let eval = SuppressionEvaluator::new(dt(5, 10, 0));
        let entry = NaiveDate::from_ymd_opt(2024, 2, 27)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap();
        let store = history(&[("Weekly Med", entry)]);
        assert!(!eval.should_suppress(&goal("Weekly Med", "Weekly"), dt(5, 10, 0), &store));
    }

    #[test]
    fn weekly_template_date_only_contributes_weekday() {
        // Template scheduled on a Tuesday months ago still means "Tuesday".
        let template = NaiveDate::from_ymd_opt(2023, 11, 7)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        let eval = SuppressionEvaluator::new(dt(5, 10, 0));
        let store = history(&[("Weekly Med", dt(5, 9, 0))]);
        assert!(eval.should_suppress(&goal("Weekly Med", "Weekly"), template, &store));
    }

    #[test]
    fn monthly_same_day_of_month_suppresses() {
        let eval = SuppressionEvaluator::new(dt(15, 12, 0));
        let store = history(&[("B12", dt(15, 7, 0))]);
        assert!(eval.should_suppress(&goal("B12", "Monthly"), dt(15, 8, 0), &store));
    }

    #[test]
    fn monthly_other_day_does_not_suppress() {
        let eval = SuppressionEvaluator::new(dt(15, 12, 0));
        let store = history(&[("B12", dt(14, 7, 0))]);
        assert!(!eval.should_suppress(&goal("B12", "Monthly"), dt(15, 8, 0), &store));
    }

    #[test]
    fn monthly_previous_month_does_not_count() {
        let entry = NaiveDate::from_ymd_opt(2024, 2, 15)
            .and_then(|d| d.and_hms_opt(7, 0, 0))
            .unwrap();
        let eval = SuppressionEvaluator::new(dt(15, 12, 0));
        let store = history(&[("B12", entry)]);
        assert!(!eval.should_suppress(&goal("B12", "Monthly"), dt(15, 8, 0), &store));
    }

    #[test]
    fn legacy_label_suppresses_like_daily() {
        let eval = SuppressionEvaluator::new(dt(5, 14, 0));
        let g = goal("Daily Med", "twice daily");

        let earlier = history(&[("Daily Med", dt(5, 13, 0))]);
        assert!(eval.should_suppress(&g, dt(5, 14, 0), &earlier));

        let later = history(&[("Daily Med", dt(5, 15, 0))]);
        let eval = SuppressionEvaluator::new(dt(5, 16, 0));
        assert!(!eval.should_suppress(&g, dt(5, 14, 0), &later));
    }

    #[test]
    fn future_entries_are_ignored() {
        let eval = SuppressionEvaluator::new(dt(5, 7, 0));
        let store = history(&[("Daily Med", dt(5, 8, 0))]);
        assert!(!eval.should_suppress(&goal("Daily Med", "Daily"), dt(5, 9, 0), &store));
    }

    struct BrokenStore;

    impl IntakeStore for BrokenStore {
        fn entries_for_name(
            &self,
            _name: &str,
            _since: NaiveDateTime,
        ) -> Result<Vec<IntakeEntry>, StoreError> {
            Err(StoreError::Locked)
        }

        fn all_entries(&self) -> Result<Vec<IntakeEntry>, StoreError> {
            Err(StoreError::Locked)
        }
    }

    #[test]
    fn store_errors_never_suppress() {
        let eval = SuppressionEvaluator::new(dt(5, 14, 0));
        assert!(!eval.should_suppress(&goal("Daily Med", "Daily"), dt(5, 14, 0), &BrokenStore));
    }

    #[test]
    fn reflects_history_changes_between_calls() {
        let eval = SuppressionEvaluator::new(dt(5, 14, 0));
        let g = goal("Daily Med", "Daily");
        let mut store = HistorySnapshot::default();
        assert!(!eval.should_suppress(&g, dt(5, 14, 0), &store));
        store.push(IntakeEntry::new("Daily Med", dt(5, 13, 55)));
        assert!(eval.should_suppress(&g, dt(5, 14, 0), &store));
    }
}
