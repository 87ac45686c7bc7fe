//! Error type shared by the store, the coordinator and the session layer.

use thiserror::Error;

/// Failure of a planner operation.
///
/// Every store call reports exactly one of these. The coordinator never
/// retries; the error is handed back to whoever invoked the mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    /// Input rejected before any remote call (missing title, bad date, ...).
    #[error("validation failed: {0}")]
    Validation(String),
    /// The mutation target no longer exists in the store.
    #[error("not found: {0}")]
    NotFound(String),
    /// The store could not be reached or failed internally.
    #[error("store unavailable: {0}")]
    Transport(String),
}

impl PlannerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

impl From<rusqlite::Error> for PlannerError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound("no matching row".to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
