use crate::models::{TallyMap, Toast, ToastKind};
use chrono::{DateTime, Utc};
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Lifecycle of a vote or reset action.
///
/// `Succeeded` and `Failed` fall back to `Idle` one dismissal delay after the
/// action settles, whatever toasts were raised in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Point-in-time copy of everything the view renders.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    pub tally: TallyMap,
    pub toast: Option<Toast>,
    pub phase: ActionPhase,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ViewSnapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == ActionPhase::Submitting
    }

    pub fn status_line(&self) -> String {
        match self.last_updated {
            Some(at) => format!("Last updated {}", at.format("%H:%M:%S UTC")),
            None => "Waiting for results...".to_string(),
        }
    }
}

#[derive(Default)]
struct ViewState {
    tally: TallyMap,
    toast: Option<Toast>,
    toast_generation: u64,
    phase: ActionPhase,
    action_generation: u64,
    last_updated: Option<DateTime<Utc>>,
}

impl ViewState {
    fn push_toast(&mut self, kind: ToastKind, text: String) -> u64 {
        self.toast_generation += 1;
        self.toast = Some(Toast::new(kind, text));
        self.toast_generation
    }
}

/// State container shared between the poller and user actions.
#[derive(Clone)]
pub struct SharedView {
    inner: Arc<Mutex<ViewState>>,
    toast_duration: Duration,
}

impl SharedView {
    pub fn new(toast_duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ViewState::default())),
            toast_duration,
        }
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.inner.lock().await;
        ViewSnapshot {
            tally: state.tally.clone(),
            toast: state.toast.clone(),
            phase: state.phase,
            last_updated: state.last_updated,
        }
    }

    /// Swap in a freshly fetched tally as a whole.
    pub async fn replace_tally(&self, tally: TallyMap) {
        let mut state = self.inner.lock().await;
        state.tally = tally;
        state.last_updated = Some(Utc::now());
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.lock().await.phase == ActionPhase::Submitting
    }

    /// Enter `Submitting` unless an action is already in flight.
    pub async fn try_begin_action(&self) -> bool {
        let mut state = self.inner.lock().await;
        if state.phase == ActionPhase::Submitting {
            return false;
        }
        state.phase = ActionPhase::Submitting;
        state.action_generation += 1;
        true
    }

    /// Settle the action in flight and show its toast under one lock.
    ///
    /// The phase returns to `Idle` after the dismissal delay even if a newer
    /// toast replaces this one first.
    pub async fn settle_with_toast(&self, succeeded: bool, kind: ToastKind, text: impl Into<String>) {
        let (toast_generation, action_generation) = {
            let mut state = self.inner.lock().await;
            state.phase = if succeeded {
                ActionPhase::Succeeded
            } else {
                ActionPhase::Failed
            };
            let toast_generation = state.push_toast(kind, text.into());
            (toast_generation, state.action_generation)
        };
        self.schedule_dismissal(toast_generation, Some(action_generation));
    }

    /// Show a toast, replacing any current one, and schedule its dismissal.
    pub async fn raise_toast(&self, kind: ToastKind, text: impl Into<String>) {
        let generation = self.inner.lock().await.push_toast(kind, text.into());
        self.schedule_dismissal(generation, None);
    }

    fn schedule_dismissal(&self, toast_generation: u64, action_generation: Option<u64>) {
        let inner = Arc::clone(&self.inner);
        let delay = self.toast_duration;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = inner.lock().await;
            // A newer toast owns its own dismissal
            if state.toast_generation == toast_generation {
                state.toast = None;
                debug!("Toast {} dismissed", toast_generation);
            }
            // Only the action that settled may be returned to idle
            if action_generation == Some(state.action_generation)
                && matches!(state.phase, ActionPhase::Succeeded | ActionPhase::Failed)
            {
                state.phase = ActionPhase::Idle;
            }
        });
    }
}
