use crate::api::VoteApi;
use crate::error::ClientError;
use crate::models::{MessageBody, TallyMap, VoteRequest};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) fn tally(pairs: &[(&str, u64)]) -> TallyMap {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Scripted `VoteApi` that records every request it receives.
pub(crate) struct FakeApi {
    results: Mutex<Result<TallyMap, ClientError>>,
    vote_response: Mutex<Result<MessageBody, ClientError>>,
    reset_response: Mutex<Result<MessageBody, ClientError>>,
    delay: Mutex<Duration>,
    fetches: AtomicUsize,
    votes: Mutex<Vec<VoteRequest>>,
    reset_keys: Mutex<Vec<Option<String>>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self {
            results: Mutex::new(Ok(TallyMap::new())),
            vote_response: Mutex::new(Ok(MessageBody::default())),
            reset_response: Mutex::new(Ok(MessageBody::default())),
            delay: Mutex::new(Duration::ZERO),
            fetches: AtomicUsize::new(0),
            votes: Mutex::new(Vec::new()),
            reset_keys: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_results(&self, results: Result<TallyMap, ClientError>) {
        *self.results.lock().unwrap() = results;
    }

    pub(crate) fn set_vote_response(&self, response: Result<MessageBody, ClientError>) {
        *self.vote_response.lock().unwrap() = response;
    }

    pub(crate) fn set_reset_response(&self, response: Result<MessageBody, ClientError>) {
        *self.reset_response.lock().unwrap() = response;
    }

    /// Every request sleeps this long (on the tokio clock) before answering.
    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn votes(&self) -> Vec<VoteRequest> {
        self.votes.lock().unwrap().clone()
    }

    pub(crate) fn reset_keys(&self) -> Vec<Option<String>> {
        self.reset_keys.lock().unwrap().clone()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl VoteApi for FakeApi {
    async fn fetch_results(&self) -> Result<TallyMap, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.results.lock().unwrap().clone()
    }

    async fn submit_vote(&self, vote: &VoteRequest) -> Result<MessageBody, ClientError> {
        self.votes.lock().unwrap().push(vote.clone());
        self.pause().await;
        self.vote_response.lock().unwrap().clone()
    }

    async fn reset(&self, admin_key: Option<&str>) -> Result<MessageBody, ClientError> {
        self.reset_keys.lock().unwrap().push(admin_key.map(str::to_string));
        self.pause().await;
        self.reset_response.lock().unwrap().clone()
    }
}
