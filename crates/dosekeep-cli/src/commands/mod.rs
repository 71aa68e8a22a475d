pub mod config;
pub mod goal;
pub mod intake;
pub mod remind;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use dosekeep_core::reminders::ScheduleBuilder;
use dosekeep_core::storage::data_dir;
use dosekeep_core::{Config, Database, GoalStore, ReminderCoordinator};

use crate::gateway::FileGateway;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Config plus the stores it names.
pub struct Context {
    pub config: Config,
    pub goals: GoalStore,
}

impl Context {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let goals = GoalStore::open(&config.store.goals)?;
        Ok(Self { config, goals })
    }

    pub fn database(&self) -> Result<Database, Box<dyn std::error::Error>> {
        Ok(Database::open(&self.config.store.database)?)
    }

    pub fn gateway(&self) -> Result<FileGateway, Box<dyn std::error::Error>> {
        Ok(FileGateway::new(
            data_dir()?.join(&self.config.store.pending),
            self.config.notifications.enabled,
        ))
    }

    pub fn coordinator(
        &self,
    ) -> Result<ReminderCoordinator<FileGateway, Database>, Box<dyn std::error::Error>> {
        let notifications = &self.config.notifications;
        Ok(ReminderCoordinator::new(self.gateway()?, self.database()?)
            .with_builder(ScheduleBuilder::new(notifications.template()))
            .with_authorization_options(notifications.authorization_options()))
    }
}

/// Single-threaded runtime for one command.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread().enable_all().build()
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse "HH:MM" on `date`.
pub fn parse_time_on(value: &str, date: NaiveDate) -> Result<NaiveDateTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|t| date.and_time(t))
        .map_err(|e| format!("invalid time '{value}' (expected HH:MM): {e}"))
}

/// Parse "YYYY-MM-DD HH:MM", "YYYY-MM-DDTHH:MM[:SS]" or "HH:MM" (today).
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, String> {
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    parse_time_on(value, now().date())
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{value}' (expected YYYY-MM-DD): {e}"))
}
