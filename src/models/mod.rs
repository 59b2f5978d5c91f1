use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vote count per candidate id, as reported by the results endpoint.
///
/// A `BTreeMap` keeps iteration order stable so derived rows and percentages
/// are deterministic between polls of an unchanged tally.
pub type TallyMap = BTreeMap<String, u64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: CandidateColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateColor {
    pub from: String,
    pub to: String,
    pub text: String,
}

impl Default for CandidateColor {
    fn default() -> Self {
        Self {
            from: "#64748b".to_string(),
            to: "#334155".to_string(),
            text: "#ffffff".to_string(),
        }
    }
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            color: CandidateColor::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: CandidateColor) -> Self {
        self.color = color;
        self
    }

    /// Placeholder for an id the backend reports but the client never declared.
    pub fn unlisted(id: &str) -> Self {
        Self::new(id, id)
    }
}

// Body of POST /vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub candidate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_id: Option<String>,
}

// `{message?: string}` as returned on both success and failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

impl Toast {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}
