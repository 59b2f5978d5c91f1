use crate::error::ClientError;
use crate::models::MessageBody;

const UNEXPECTED: &str = "An unexpected error occurred.";

pub fn poll_failure_text(error: &ClientError) -> String {
    match error {
        ClientError::Transport(_) => "Could not reach the results service.".to_string(),
        _ => "Could not fetch results.".to_string(),
    }
}

pub fn vote_success_text(display_name: &str) -> String {
    format!("Voted for {}!", display_name)
}

pub fn vote_failure_text(error: &ClientError) -> String {
    match error {
        ClientError::Transport(_) => UNEXPECTED.to_string(),
        ClientError::Unauthorized { .. } => match error.server_message() {
            Some(message) => format!("Unauthorized: {}", message),
            None => "Unauthorized: your vote was rejected.".to_string(),
        },
        _ => match error.server_message() {
            Some(message) => format!("Error: {}", message),
            None => "Error: Could not submit vote.".to_string(),
        },
    }
}

pub fn reset_success_text(body: &MessageBody) -> String {
    body.message
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "Votes have been reset.".to_string())
}

pub fn reset_failure_text(error: &ClientError) -> String {
    match error {
        ClientError::Transport(_) => UNEXPECTED.to_string(),
        ClientError::Unauthorized { .. } => "Unauthorized. Invalid admin key.".to_string(),
        _ => match error.server_message() {
            Some(message) => format!("Error: {}", message),
            None => "Failed to reset votes.".to_string(),
        },
    }
}
