//! The notification delivery boundary.
//!
//! The engine never talks to the OS notification center directly; it goes
//! through a [`NotificationGateway`]. The gateway's pending list is the only
//! record of scheduled reminders and is re-fetched for every decision.

mod memory;

pub use memory::{GatewayCall, MemoryGateway};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::reminders::trigger::{NotificationCategory, PendingTrigger, TriggerSpec};

/// Alert styles to request permission for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationOptions {
    pub alert: bool,
    pub sound: bool,
    pub badge: bool,
}

impl Default for AuthorizationOptions {
    fn default() -> Self {
        Self {
            alert: true,
            sound: true,
            badge: false,
        }
    }
}

/// A serially-consistent notification scheduler.
///
/// Every call completes atomically from the caller's point of view.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Ask for permission to post notifications. `Ok(false)` is a refusal.
    async fn request_authorization(
        &self,
        options: AuthorizationOptions,
    ) -> Result<bool, GatewayError>;

    /// Queue a trigger, replacing any pending trigger with the same identifier.
    async fn submit(&self, spec: &TriggerSpec) -> Result<(), GatewayError>;

    /// Every trigger still waiting to fire.
    async fn list_pending(&self) -> Result<Vec<PendingTrigger>, GatewayError>;

    /// Remove the given pending triggers. Unknown identifiers are ignored.
    async fn cancel(&self, identifiers: &[String]) -> Result<(), GatewayError>;

    /// Remove every pending trigger.
    async fn cancel_all(&self) -> Result<(), GatewayError>;

    /// Install the action categories reminders may reference.
    async fn register_categories(
        &self,
        categories: &[NotificationCategory],
    ) -> Result<(), GatewayError>;
}
