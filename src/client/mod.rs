pub mod notifications;
pub mod state;

use crate::api::VoteApi;
use crate::config::{ClientConfig, ResetAuth};
use crate::credentials::{CredentialProvider, NoCredential};
use crate::identity::{self, IdentityGenerator, UuidGenerator};
use crate::models::{ToastKind, VoteRequest};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::tasks::results_poller::{PollerHandle, ResultsPoller};
use crate::voting::{ResultsRow, results_rows};
use log::{error, info, warn};
use notifications::{reset_failure_text, reset_success_text, vote_failure_text, vote_success_text};
use state::{SharedView, ViewSnapshot};
use std::sync::{Arc, Mutex};

pub const ADMIN_KEY_PROMPT: &str = "Enter admin key to reset votes:";

/// How a vote or reset request ended, from the caller's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded,
    Failed,
    // another action was still in flight; nothing was sent
    Busy,
    // no admin key was given; nothing was sent
    Cancelled,
}

pub struct VotingClient {
    config: Arc<ClientConfig>,
    api: Arc<dyn VoteApi>,
    store: Arc<dyn KeyValueStore>,
    identities: Arc<dyn IdentityGenerator>,
    credentials: Arc<dyn CredentialProvider>,
    view: SharedView,
    poller: Mutex<Option<PollerHandle>>,
}

impl VotingClient {
    pub fn new(config: ClientConfig, api: Arc<dyn VoteApi>) -> Self {
        let view = SharedView::new(config.toast_duration);
        Self {
            config: Arc::new(config),
            api,
            store: Arc::new(MemoryStore::new()),
            identities: Arc::new(UuidGenerator),
            credentials: Arc::new(NoCredential),
            view,
            poller: Mutex::new(None),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_identity_generator(mut self, identities: Arc<dyn IdentityGenerator>) -> Self {
        self.identities = identities;
        self
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn view(&self) -> SharedView {
        self.view.clone()
    }

    /// Start polling results. Mounting twice keeps the running poller.
    pub fn mount(&self) {
        let Ok(mut slot) = self.poller.lock() else {
            error!("Poller slot poisoned; results will not refresh");
            return;
        };
        if slot.is_some() {
            return;
        }
        let poller = ResultsPoller::new(
            Arc::clone(&self.api),
            self.view.clone(),
            self.config.poll_interval,
        );
        *slot = Some(poller.start());
    }

    /// Stop polling. A fetch already in flight still lands in the view.
    pub fn unmount(&self) {
        if let Ok(mut slot) = self.poller.lock() {
            if let Some(handle) = slot.take() {
                handle.stop();
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.poller
            .lock()
            .map(|slot| slot.as_ref().is_some_and(PollerHandle::is_running))
            .unwrap_or(false)
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.view.snapshot().await
    }

    pub async fn results_rows(&self) -> Vec<ResultsRow> {
        let snapshot = self.view.snapshot().await;
        results_rows(&self.config.candidates, &snapshot.tally)
    }

    pub async fn vote(&self, candidate_id: &str) -> ActionOutcome {
        if !self.view.try_begin_action().await {
            warn!("Vote for {} ignored: another action is in flight", candidate_id);
            return ActionOutcome::Busy;
        }

        let voter_id = if self.config.track_voter_identity {
            Some(self.resolve_voter_id().await)
        } else {
            None
        };
        let request = VoteRequest {
            candidate: candidate_id.to_string(),
            voter_id,
        };
        let display_name = self.config.display_name(candidate_id);

        match self.api.submit_vote(&request).await {
            Ok(body) => {
                info!(
                    "Vote for {} accepted{}",
                    candidate_id,
                    body.message.map(|m| format!(": {}", m)).unwrap_or_default()
                );
                self.view
                    .settle_with_toast(true, ToastKind::Success, vote_success_text(&display_name))
                    .await;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                warn!("Vote for {} failed: {}", candidate_id, e);
                self.view
                    .settle_with_toast(false, ToastKind::Error, vote_failure_text(&e))
                    .await;
                ActionOutcome::Failed
            }
        }
    }

    pub async fn reset(&self) -> ActionOutcome {
        // The affordance is disabled while loading, so never prompt then
        if self.view.is_loading().await {
            warn!("Reset ignored: another action is in flight");
            return ActionOutcome::Busy;
        }

        let admin_key = match self.config.reset_auth {
            ResetAuth::Prompt => match self.credentials.request_credential(ADMIN_KEY_PROMPT).await {
                Some(key) if !key.is_empty() => Some(key),
                _ => {
                    info!("Reset cancelled: no admin key given");
                    return ActionOutcome::Cancelled;
                }
            },
            ResetAuth::None => None,
        };

        if !self.view.try_begin_action().await {
            warn!("Reset ignored: another action is in flight");
            return ActionOutcome::Busy;
        }

        match self.api.reset(admin_key.as_deref()).await {
            Ok(body) => {
                info!("Votes reset");
                self.view
                    .settle_with_toast(true, ToastKind::Success, reset_success_text(&body))
                    .await;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                if e.is_unauthorized() {
                    warn!("Reset rejected: admin key not accepted");
                } else {
                    error!("Reset failed: {}", e);
                }
                self.view
                    .settle_with_toast(false, ToastKind::Error, reset_failure_text(&e))
                    .await;
                ActionOutcome::Failed
            }
        }
    }

    // Storage trouble must not block voting; fall back to an unsaved id.
    async fn resolve_voter_id(&self) -> String {
        match identity::voter_id(self.store.as_ref(), self.identities.as_ref()).await {
            Ok(id) => id,
            Err(e) => {
                error!("Could not load voter id, using a temporary one: {}", e);
                self.identities.generate()
            }
        }
    }
}

impl Drop for VotingClient {
    fn drop(&mut self) {
        self.unmount();
    }
}
