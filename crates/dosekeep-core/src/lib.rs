//! # Dosekeep Core Library
//!
//! Reminder scheduling and suppression for intake goals (medication,
//! supplements, anything taken on a schedule). The `dosekeep` CLI is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Reminders**: builds calendar triggers from goals, reschedules them
//!   through a [`NotificationGateway`], and suppresses reminders the user
//!   has already acted on
//! - **Gateway**: async boundary to the platform notification center
//! - **Storage**: SQLite intake log, TOML goal file and configuration
//!
//! ## Key Components
//!
//! - [`ReminderCoordinator`]: scheduling state machine
//! - [`SuppressionEvaluator`]: "already taken?" check at delivery time
//! - [`Database`]: intake history persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod gateway;
pub mod model;
pub mod reminders;
pub mod storage;

pub use error::{ConfigError, GatewayError, ReminderError, StoreError};
pub use gateway::{AuthorizationOptions, MemoryGateway, NotificationGateway};
pub use model::{Goal, IntakeEntry};
pub use reminders::{
    Frequency, ReminderCoordinator, ScheduleBuilder, ScheduleReport, SchedulingPhase,
    SupersessionResolver, SuppressionEvaluator, TriggerSpec,
};
pub use storage::{Config, Database, GoalStore, HistorySnapshot, IntakeStore};
