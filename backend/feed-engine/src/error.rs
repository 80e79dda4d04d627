/// Error types for feed-engine
///
/// None of these cross the `FeedEngine` boundary. Source errors are absorbed
/// as "zero items this round"; config errors only surface at startup.
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Source returned HTTP status {0}")]
    Status(u16),

    #[error("Failed to decode source page: {0}")]
    Decode(String),

    #[error("Source fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Label used for the `outcome` dimension of fetch metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            SourceError::Timeout(_) => "timeout",
            _ => "error",
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment error: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type SourceResult<T> = Result<T, SourceError>;
