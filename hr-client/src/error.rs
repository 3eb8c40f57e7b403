use thiserror::Error;

use crate::composer::DraftIssue;
use crate::directory::UserIssue;
use crate::domain::InvalidTransition;

/// Everything that can go wrong talking to the HR API or preparing a call.
///
/// None of these are fatal: callers show [`LeaveError::user_message`] and
/// keep whatever they were displaying.
#[derive(Error, Debug)]
pub enum LeaveError {
    #[error("{}", .0.first().map(|i| i.message()).unwrap_or_default())]
    Validation(Vec<DraftIssue>),
    #[error("{}", .0.first().map(|i| i.message()).unwrap_or_default())]
    InvalidUser(Vec<UserIssue>),
    #[error("A rejection reason is required")]
    EmptyRejectionReason,
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl LeaveError {
    /// Build the error for a non-success HTTP status. `message` is the
    /// server's own text when the body had one.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => LeaveError::Unauthenticated(
                message.unwrap_or_else(|| SESSION_EXPIRED.to_string()),
            ),
            403 => LeaveError::Forbidden(
                message.unwrap_or_else(|| "You are not allowed to do that".to_string()),
            ),
            400 | 404 | 409 | 422 => LeaveError::Conflict(
                message.unwrap_or_else(|| "The request could not be processed".to_string()),
            ),
            _ => LeaveError::Server {
                status,
                message: message.unwrap_or_default(),
            },
        }
    }

    /// The message to put in front of the user: the server's text verbatim
    /// when there is one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            LeaveError::Validation(_)
            | LeaveError::InvalidUser(_)
            | LeaveError::EmptyRejectionReason
            | LeaveError::Unauthenticated(_)
            | LeaveError::Forbidden(_)
            | LeaveError::Conflict(_) => self.to_string(),
            LeaveError::Server { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, LeaveError::Unauthenticated(_))
    }

    /// The next refetch will show the authoritative state.
    pub fn is_state_conflict(&self) -> bool {
        matches!(self, LeaveError::Conflict(_))
    }
}

pub const SESSION_EXPIRED: &str = "Session expired or invalid. Run `hr-tui login` to authenticate.";

impl From<InvalidTransition> for LeaveError {
    fn from(e: InvalidTransition) -> Self {
        LeaveError::Conflict(e.to_string())
    }
}

impl From<reqwest::Error> for LeaveError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LeaveError::Parsing(e.to_string())
        } else {
            LeaveError::Transport(e.to_string())
        }
    }
}

impl From<std::io::Error> for LeaveError {
    fn from(e: std::io::Error) -> Self {
        LeaveError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LeaveError>;
