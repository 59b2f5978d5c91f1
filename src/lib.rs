pub mod api;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod models;
pub mod storage;
pub mod tasks;
pub mod voting;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ActionOutcome, VotingClient};
pub use config::{ClientConfig, ResetAuth};
pub use error::{ClientError, ConfigError, StorageError};
