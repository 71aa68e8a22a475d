//! Reminder coordinator.
//!
//! Drives the scheduling of one goal against a [`NotificationGateway`]:
//!
//! ```text
//! Idle -> AuthorizationPending -> Granted -> CancellingExisting -> Submitting -> Done
//!                              \-> Denied -> Done
//! ```
//!
//! A denial stops before any other gateway call. Once granted, every pending
//! trigger of the goal is cancelled before fresh ones are submitted, so a
//! reschedule always starts from zero. Submissions are independent: one
//! failing does not roll back the others.
//!
//! Calls for the same goal must not overlap; the caller serializes them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::builder::ScheduleBuilder;
use super::identifier::matches_goal;
use super::suppression::SuppressionEvaluator;
use super::supersession::SupersessionResolver;
use super::trigger::{NotificationCategory, PendingTrigger};
use crate::error::{ReminderError, Result};
use crate::gateway::{AuthorizationOptions, NotificationGateway};
use crate::model::Goal;
use crate::storage::IntakeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPhase {
    Idle,
    AuthorizationPending,
    Granted,
    Denied,
    CancellingExisting,
    Submitting,
    Done,
}

impl SchedulingPhase {
    pub fn can_transition_to(self, next: SchedulingPhase) -> bool {
        use SchedulingPhase::*;
        matches!(
            (self, next),
            (Idle, AuthorizationPending)
                | (AuthorizationPending, Granted)
                | (AuthorizationPending, Denied)
                | (Denied, Done)
                | (Granted, CancellingExisting)
                | (CancellingExisting, Submitting)
                | (Submitting, Done)
        )
    }
}

/// A trigger the gateway refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFailure {
    pub identifier: String,
    pub message: String,
}

/// Outcome of one `schedule_reminder` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub goal_id: String,
    /// Every phase visited, starting with `Idle`.
    pub phases: Vec<SchedulingPhase>,
    pub cancelled: Vec<String>,
    pub submitted: Vec<String>,
    pub failures: Vec<SubmissionFailure>,
}

impl ScheduleReport {
    fn new(goal_id: &str) -> Self {
        Self {
            goal_id: goal_id.to_string(),
            phases: vec![SchedulingPhase::Idle],
            cancelled: Vec::new(),
            submitted: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn phase(&self) -> SchedulingPhase {
        self.phases.last().copied().unwrap_or(SchedulingPhase::Idle)
    }

    /// Every built trigger was accepted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn a partial success into an error.
    pub fn into_result(self) -> Result<Self> {
        if self.is_complete() {
            return Ok(self);
        }
        Err(ReminderError::PartialFailure {
            failed: self.failures.len(),
            total: self.failures.len() + self.submitted.len(),
        })
    }

    fn advance(&mut self, next: SchedulingPhase) {
        let from = self.phase();
        debug_assert!(from.can_transition_to(next), "{from:?} -> {next:?}");
        debug!(goal = %self.goal_id, ?from, to = ?next, "scheduling phase");
        self.phases.push(next);
    }
}

/// Schedules, cancels and checks reminders for goals.
pub struct ReminderCoordinator<G, S> {
    gateway: G,
    store: S,
    builder: ScheduleBuilder,
    options: AuthorizationOptions,
}

impl<G: NotificationGateway, S: IntakeStore> ReminderCoordinator<G, S> {
    pub fn new(gateway: G, store: S) -> Self {
        Self {
            gateway,
            store,
            builder: ScheduleBuilder::default(),
            options: AuthorizationOptions::default(),
        }
    }

    pub fn with_builder(mut self, builder: ScheduleBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_authorization_options(mut self, options: AuthorizationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace every pending reminder of `goal` with freshly built ones.
    ///
    /// # Errors
    /// `AuthorizationDenied` if permission is refused or the request fails;
    /// gateway errors while listing or cancelling existing triggers. Rejected
    /// submissions are reported in [`ScheduleReport::failures`].
    pub async fn schedule_reminder(&self, goal: &Goal) -> Result<ScheduleReport> {
        let mut report = ScheduleReport::new(&goal.id);

        report.advance(SchedulingPhase::AuthorizationPending);
        let granted = match self.gateway.request_authorization(self.options).await {
            Ok(granted) => granted,
            Err(e) => {
                warn!(goal = %goal.id, "authorization request failed: {e}");
                false
            }
        };
        if !granted {
            report.advance(SchedulingPhase::Denied);
            report.advance(SchedulingPhase::Done);
            info!(goal = %goal.id, "notifications not authorized, nothing scheduled");
            return Err(ReminderError::AuthorizationDenied);
        }
        report.advance(SchedulingPhase::Granted);

        report.advance(SchedulingPhase::CancellingExisting);
        report.cancelled = self.cancel_reminders(goal).await?;

        report.advance(SchedulingPhase::Submitting);
        let specs = if goal.wants_reminders() {
            self.builder.build(goal)
        } else {
            info!(goal = %goal.id, "goal wants no reminders, existing ones cleared");
            Vec::new()
        };
        for spec in &specs {
            match self.gateway.submit(spec).await {
                Ok(()) => report.submitted.push(spec.identifier.clone()),
                Err(e) => {
                    let err = ReminderError::Scheduling {
                        identifier: spec.identifier.clone(),
                        message: e.to_string(),
                    };
                    warn!(goal = %goal.id, "{err}");
                    report.failures.push(SubmissionFailure {
                        identifier: spec.identifier.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report.advance(SchedulingPhase::Done);
        info!(
            goal = %goal.id,
            cancelled = report.cancelled.len(),
            submitted = report.submitted.len(),
            failed = report.failures.len(),
            "reminders scheduled"
        );
        Ok(report)
    }

    /// Cancel every pending trigger of `goal`, returning their identifiers.
    ///
    /// Needs no authorization.
    pub async fn cancel_reminders(&self, goal: &Goal) -> Result<Vec<String>> {
        let identifiers: Vec<String> = self
            .pending_for(goal)
            .await?
            .into_iter()
            .map(|p| p.identifier)
            .collect();

        if !identifiers.is_empty() {
            self.gateway.cancel(&identifiers).await?;
            debug!(goal = %goal.id, count = identifiers.len(), "cancelled pending reminders");
        }
        Ok(identifiers)
    }

    /// Pending triggers belonging to `goal`, fetched live.
    pub async fn pending_for(&self, goal: &Goal) -> Result<Vec<PendingTrigger>> {
        Ok(self
            .gateway
            .list_pending()
            .await?
            .into_iter()
            .filter(|p| matches_goal(&p.identifier, &goal.id))
            .collect())
    }

    /// Whether the reminder of `goal` due at `scheduled` should be withheld.
    pub fn should_suppress(
        &self,
        goal: &Goal,
        scheduled: NaiveDateTime,
        now: NaiveDateTime,
    ) -> bool {
        SuppressionEvaluator::new(now).should_suppress(goal, scheduled, &self.store)
    }

    /// Cancel pending triggers of `goal` set for an earlier time of day than
    /// `scheduled`, returning their identifiers.
    pub async fn retract_superseded(
        &self,
        goal: &Goal,
        scheduled: NaiveDateTime,
    ) -> Result<Vec<String>> {
        let pending = self.pending_for(goal).await?;
        let stale = SupersessionResolver::resolve(&pending, scheduled);
        if !stale.is_empty() {
            self.gateway.cancel(&stale).await?;
            info!(goal = %goal.id, count = stale.len(), "retracted superseded reminders");
        }
        Ok(stale)
    }

    /// Install the reminder action category referenced by built triggers.
    pub async fn register_categories(&self) -> Result<()> {
        let category = NotificationCategory::intake_reminder(&self.builder.template().category);
        self.gateway.register_categories(&[category]).await?;
        Ok(())
    }
}
