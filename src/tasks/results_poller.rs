use crate::api::VoteApi;
use crate::client::notifications::poll_failure_text;
use crate::client::state::SharedView;
use crate::error::ClientError;
use crate::models::ToastKind;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;

pub struct ResultsPoller {
    api: Arc<dyn VoteApi>,
    view: SharedView,
    period: Duration,
}

impl ResultsPoller {
    pub fn new(api: Arc<dyn VoteApi>, view: SharedView, period: Duration) -> Self {
        Self { api, view, period }
    }

    /// Poll right away, then once per period, until the handle is stopped or dropped.
    pub fn start(self) -> PollerHandle {
        PollerHandle {
            task: tokio::spawn(self.run()),
        }
    }

    async fn run(self) {
        info!("Starting results poller, every {:?}", self.period);
        let mut ticker = interval(self.period);

        loop {
            ticker.tick().await; // first tick completes immediately
            debug!("Polling results");

            // Each fetch runs on its own so a slow response never delays the schedule.
            // Whichever response completes last is what the view shows.
            let api = Arc::clone(&self.api);
            let view = self.view.clone();
            tokio::spawn(async move {
                if let Err(e) = poll_once(api.as_ref(), &view).await {
                    debug!("Keeping previous tally after failed poll ({})", e);
                }
            });
        }
    }
}

/// Fetch the tally once and publish it; on failure the shown tally is kept.
pub async fn poll_once(api: &dyn VoteApi, view: &SharedView) -> Result<(), ClientError> {
    match api.fetch_results().await {
        Ok(tally) => {
            debug!("Received tally for {} candidate(s)", tally.len());
            view.replace_tally(tally).await;
            Ok(())
        }
        Err(e) => {
            warn!("Could not fetch results: {}", e);
            view.raise_toast(ToastKind::Error, poll_failure_text(&e)).await;
            Err(e)
        }
    }
}

/// Running poller; stops the schedule on `stop` or drop.
///
/// Requests already in flight are left to finish.
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
        info!("Results poller stopped");
    }
}
