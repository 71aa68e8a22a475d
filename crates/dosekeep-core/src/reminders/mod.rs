//! Reminder scheduling and suppression.
//!
//! Turns goals into calendar triggers, keeps the gateway's pending list in
//! step with goal edits, and decides at delivery time whether a reminder is
//! still needed.

pub mod builder;
pub mod coordinator;
pub mod frequency;
pub mod identifier;
pub mod supersession;
pub mod suppression;
pub mod trigger;

pub use builder::{ReminderTemplate, ScheduleBuilder};
pub use coordinator::{ReminderCoordinator, ScheduleReport, SchedulingPhase, SubmissionFailure};
pub use frequency::Frequency;
pub use identifier::{DecodedIdentifier, Slot};
pub use supersession::SupersessionResolver;
pub use suppression::SuppressionEvaluator;
pub use trigger::{
    CalendarPattern, NotificationAction, NotificationCategory, NotificationContent,
    PendingTrigger, TriggerPattern, TriggerSpec,
};
