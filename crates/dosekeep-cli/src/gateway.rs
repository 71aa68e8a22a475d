//! File-backed notification gateway for the CLI.
//!
//! Pending triggers live in a JSON file in the data directory so that
//! `remind pending` in a later invocation sees what `remind schedule` queued.

use std::path::PathBuf;

use async_trait::async_trait;
use dosekeep_core::error::GatewayError;
use dosekeep_core::gateway::{AuthorizationOptions, NotificationGateway};
use dosekeep_core::reminders::{NotificationCategory, PendingTrigger, TriggerSpec};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PendingFile {
    #[serde(default)]
    triggers: Vec<TriggerSpec>,
    #[serde(default)]
    categories: Vec<NotificationCategory>,
}

pub struct FileGateway {
    path: PathBuf,
    enabled: bool,
}

impl FileGateway {
    /// `enabled` is the answer given to authorization requests.
    pub fn new(path: PathBuf, enabled: bool) -> Self {
        Self { path, enabled }
    }

    /// Full specs of every pending trigger.
    pub fn specs(&self) -> Result<Vec<TriggerSpec>, GatewayError> {
        Ok(self.read()?.triggers)
    }

    fn read(&self) -> Result<PendingFile, GatewayError> {
        if !self.path.exists() {
            return Ok(PendingFile::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(PendingFile::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, file: &PendingFile) -> Result<(), GatewayError> {
        let content = serde_json::to_string_pretty(file)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[async_trait]
impl NotificationGateway for FileGateway {
    async fn request_authorization(
        &self,
        options: AuthorizationOptions,
    ) -> Result<bool, GatewayError> {
        debug!(?options, granted = self.enabled, "authorization requested");
        Ok(self.enabled)
    }

    async fn submit(&self, spec: &TriggerSpec) -> Result<(), GatewayError> {
        spec.pattern
            .validate()
            .map_err(|reason| GatewayError::Rejected(format!("{}: {reason}", spec.identifier)))?;
        let mut file = self.read()?;
        file.triggers.retain(|t| t.identifier != spec.identifier);
        file.triggers.push(spec.clone());
        self.write(&file)
    }

    async fn list_pending(&self) -> Result<Vec<PendingTrigger>, GatewayError> {
        Ok(self.read()?.triggers.iter().map(PendingTrigger::from).collect())
    }

    async fn cancel(&self, identifiers: &[String]) -> Result<(), GatewayError> {
        let mut file = self.read()?;
        file.triggers.retain(|t| !identifiers.contains(&t.identifier));
        self.write(&file)
    }

    async fn cancel_all(&self) -> Result<(), GatewayError> {
        let mut file = self.read()?;
        file.triggers.clear();
        self.write(&file)
    }

    async fn register_categories(
        &self,
        categories: &[NotificationCategory],
    ) -> Result<(), GatewayError> {
        let mut file = self.read()?;
        file.categories = categories.to_vec();
        self.write(&file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dosekeep_core::{Goal, ScheduleBuilder};

    fn specs() -> Vec<TriggerSpec> {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap();
        ScheduleBuilder::default().build(&Goal::new("Iron", "Daily").with_id("g1").with_target(at))
    }

    #[tokio::test]
    async fn pending_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pending.json");

        let gateway = FileGateway::new(path.clone(), true);
        for spec in specs() {
            gateway.submit(&spec).await.unwrap();
            gateway.submit(&spec).await.unwrap();
        }

        let reopened = FileGateway::new(path, true);
        let pending = reopened.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].identifier, "reminder-g1-8-0");

        reopened.cancel(&["reminder-g1-8-0".to_string()]).await.unwrap();
        assert!(reopened.list_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn authorization_follows_enabled_flag() {
        let dir = tempfile::tempdir().unwrap();
        let options = AuthorizationOptions::default();
        let off = FileGateway::new(dir.path().join("pending.json"), false);
        assert!(!off.request_authorization(options).await.unwrap());
    }
}
