use thiserror::Error;

/// Failure of a single request against the vote or result API.
///
/// Kept `Clone` so a failure can be both logged and turned into a toast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unauthorized (401)")]
    Unauthorized { message: Option<String> },

    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ClientError {
    /// Server-supplied message, if the error body carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Unauthorized { message } | ClientError::Status { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidDuration { key: &'static str, value: String },

    #[error("{key} must be true or false, got {value:?}")]
    InvalidBool { key: &'static str, value: String },

    #[error("VOTE_RESET_AUTH must be \"prompt\" or \"none\", got {0:?}")]
    InvalidResetAuth(String),

    #[error("invalid candidate list: {0}")]
    InvalidCandidates(String),
}
