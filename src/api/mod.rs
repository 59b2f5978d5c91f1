mod http;

pub use http::HttpVoteApi;

use crate::error::ClientError;
use crate::models::{MessageBody, TallyMap, VoteRequest};
use async_trait::async_trait;

/// Requests the client makes against the vote and result services.
#[async_trait]
pub trait VoteApi: Send + Sync {
    // GET results
    async fn fetch_results(&self) -> Result<TallyMap, ClientError>;

    // POST vote
    async fn submit_vote(&self, vote: &VoteRequest) -> Result<MessageBody, ClientError>;

    // POST reset, with the admin key forwarded as-is when present
    async fn reset(&self, admin_key: Option<&str>) -> Result<MessageBody, ClientError>;
}
