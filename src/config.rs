use crate::error::ConfigError;
use crate::models::{Candidate, CandidateColor};
use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const DEFAULT_TOAST_MS: u64 = 3000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
const DEFAULT_STATE_URL: &str = "sqlite:vote_client_state.db";

/// Whether the reset flow asks the user for an admin key before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetAuth {
    Prompt,
    None,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub results_path: String,
    pub vote_path: String,
    pub reset_path: String,
    pub poll_interval: Duration,
    pub toast_duration: Duration,
    pub request_timeout: Duration,
    pub reset_auth: ResetAuth,
    pub track_voter_identity: bool,
    pub state_url: String,
    pub candidates: Vec<Candidate>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            results_path: "/api/results".to_string(),
            vote_path: "/api/vote".to_string(),
            reset_path: "/api/reset".to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            toast_duration: Duration::from_millis(DEFAULT_TOAST_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            reset_auth: ResetAuth::Prompt,
            track_voter_identity: true,
            state_url: DEFAULT_STATE_URL.to_string(),
            candidates: default_candidates(),
        }
    }
}

pub fn default_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("a", "Candidate A")
            .with_description("The first option on the ballot")
            .with_color(CandidateColor {
                from: "#3b82f6".to_string(),
                to: "#1d4ed8".to_string(),
                text: "#ffffff".to_string(),
            }),
        Candidate::new("b", "Candidate B")
            .with_description("The second option on the ballot")
            .with_color(CandidateColor {
                from: "#ef4444".to_string(),
                to: "#b91c1c".to_string(),
                text: "#ffffff".to_string(),
            }),
    ]
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("VOTE_API_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = lookup("VOTE_RESULTS_PATH") {
            config.results_path = path;
        }
        if let Some(path) = lookup("VOTE_SUBMIT_PATH") {
            config.vote_path = path;
        }
        if let Some(path) = lookup("VOTE_RESET_PATH") {
            config.reset_path = path;
        }
        if let Some(value) = lookup("VOTE_POLL_INTERVAL_MS") {
            config.poll_interval = parse_millis("VOTE_POLL_INTERVAL_MS", &value)?;
        }
        if let Some(value) = lookup("VOTE_TOAST_MS") {
            config.toast_duration = parse_millis("VOTE_TOAST_MS", &value)?;
        }
        if let Some(value) = lookup("VOTE_REQUEST_TIMEOUT_MS") {
            config.request_timeout = parse_millis("VOTE_REQUEST_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("VOTE_RESET_AUTH") {
            config.reset_auth = match value.trim().to_ascii_lowercase().as_str() {
                "prompt" => ResetAuth::Prompt,
                "none" => ResetAuth::None,
                _ => return Err(ConfigError::InvalidResetAuth(value)),
            };
        }
        if let Some(value) = lookup("VOTE_TRACK_VOTER_ID") {
            config.track_voter_identity = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidBool {
                        key: "VOTE_TRACK_VOTER_ID",
                        value,
                    });
                }
            };
        }
        if let Some(url) = lookup("VOTE_STATE_URL") {
            config.state_url = url;
        }
        if let Some(list) = lookup("VOTE_CANDIDATES") {
            config.candidates = parse_candidates(&list)?;
        }

        Ok(config)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|candidate| candidate.id == id)
    }

    /// Display name for a candidate id, falling back to the id itself.
    pub fn display_name(&self, id: &str) -> String {
        self.candidate(id)
            .map(|candidate| candidate.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

fn parse_millis(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidDuration {
            key,
            value: value.to_string(),
        }),
    }
}

// Format: id:Display Name,id:Display Name
fn parse_candidates(list: &str) -> Result<Vec<Candidate>, ConfigError> {
    let mut candidates: Vec<Candidate> = Vec::new();

    for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (id, name) = match entry.split_once(':') {
            Some((id, name)) => (id.trim(), name.trim()),
            None => (entry, entry),
        };
        if id.is_empty() {
            return Err(ConfigError::InvalidCandidates(format!("empty id in {:?}", entry)));
        }
        if candidates.iter().any(|c| c.id == id) {
            return Err(ConfigError::InvalidCandidates(format!("duplicate id {:?}", id)));
        }
        let name = if name.is_empty() { id } else { name };
        candidates.push(Candidate::new(id, name));
    }

    if candidates.is_empty() {
        return Err(ConfigError::InvalidCandidates("no candidates given".to_string()));
    }
    Ok(candidates)
}
