//! In-memory notification gateway.
//!
//! Used by tests and by hosts without a platform notification center. Can be
//! told to refuse authorization or reject specific identifiers, and records
//! every call so ordering can be checked.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{AuthorizationOptions, NotificationGateway};
use crate::error::GatewayError;
use crate::reminders::trigger::{NotificationCategory, PendingTrigger, TriggerSpec};

/// A gateway call, as recorded by [`MemoryGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    RequestAuthorization,
    Submit(String),
    ListPending,
    Cancel(Vec<String>),
    CancelAll,
    RegisterCategories(usize),
}

#[derive(Debug, Default)]
struct State {
    pending: Vec<PendingTrigger>,
    specs: BTreeMap<String, TriggerSpec>,
    categories: Vec<NotificationCategory>,
    deny: bool,
    authorization_error: Option<String>,
    rejected: HashSet<String>,
    calls: Vec<GatewayCall>,
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
}

impl MemoryGateway {
    /// A gateway that grants authorization.
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that answers authorization requests with a refusal.
    pub fn denying() -> Self {
        let gateway = Self::new();
        gateway.lock().deny = true;
        gateway
    }

    /// Make authorization requests fail with a platform error.
    pub fn fail_authorization(&self, message: &str) {
        self.lock().authorization_error = Some(message.to_string());
    }

    /// Reject future submissions of `identifier`.
    pub fn reject(&self, identifier: &str) {
        self.lock().rejected.insert(identifier.to_string());
    }

    /// Seed a pending trigger directly, bypassing `submit`.
    pub fn insert_pending(&self, pending: PendingTrigger) {
        let mut state = self.lock();
        state.pending.retain(|p| p.identifier != pending.identifier);
        state.pending.push(pending);
    }

    pub fn pending_identifiers(&self) -> Vec<String> {
        self.lock().pending.iter().map(|p| p.identifier.clone()).collect()
    }

    /// The spec last submitted under `identifier`, if still pending.
    pub fn spec(&self, identifier: &str) -> Option<TriggerSpec> {
        self.lock().specs.get(identifier).cloned()
    }

    pub fn categories(&self) -> Vec<NotificationCategory> {
        self.lock().categories.clone()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NotificationGateway for MemoryGateway {
    async fn request_authorization(
        &self,
        _options: AuthorizationOptions,
    ) -> Result<bool, GatewayError> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::RequestAuthorization);
        if let Some(message) = &state.authorization_error {
            return Err(GatewayError::Authorization(message.clone()));
        }
        Ok(!state.deny)
    }

    async fn submit(&self, spec: &TriggerSpec) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::Submit(spec.identifier.clone()));
        if state.rejected.contains(&spec.identifier) {
            return Err(GatewayError::Rejected(format!(
                "identifier '{}' refused",
                spec.identifier
            )));
        }
        state.pending.retain(|p| p.identifier != spec.identifier);
        state.pending.push(PendingTrigger::from(spec));
        state.specs.insert(spec.identifier.clone(), spec.clone());
        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<PendingTrigger>, GatewayError> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::ListPending);
        Ok(state.pending.clone())
    }

    async fn cancel(&self, identifiers: &[String]) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::Cancel(identifiers.to_vec()));
        state.pending.retain(|p| !identifiers.contains(&p.identifier));
        for id in identifiers {
            state.specs.remove(id);
        }
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::CancelAll);
        state.pending.clear();
        state.specs.clear();
        Ok(())
    }

    async fn register_categories(
        &self,
        categories: &[NotificationCategory],
    ) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::RegisterCategories(categories.len()));
        state.categories = categories.to_vec();
        Ok(())
    }
}
