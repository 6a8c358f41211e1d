//! Errors returned by the hire client.

use crate::domain::{InvalidClientTime, InvalidLocationKey};
use crate::workflow::WorkflowError;

/// The response arrived but did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    /// No release code in a confirm-hire response. Typical causes: a hire is
    /// already in progress, the station has no bikes, or the app changed.
    #[error("release code not found in response ({fragments} fragments)")]
    CodeNotFound { fragments: usize },
}

/// Errors from hire client operations.
#[derive(Debug, thiserror::Error)]
pub enum HireError {
    /// Caller configuration problem; never retried
    #[error("configuration error: {0}")]
    Config(String),

    /// Network, status or body failure
    #[error("transport failure: {0}")]
    Transport(#[from] WorkflowError),

    /// Well-formed response without the expected payload
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// Every attempted token strategy failed
    #[error("all token strategies failed for {target}: {last}")]
    ExhaustedStrategies {
        target: String,
        #[source]
        last: Box<HireError>,
    },

    /// Nothing was enabled, or no token source existed
    #[error("no token strategy available for {0}")]
    NoStrategyAvailable(String),
}

impl HireError {
    /// Whether the failure came from the remote side rather than from
    /// caller configuration.
    pub fn is_remote(&self) -> bool {
        match self {
            HireError::Transport(_) | HireError::Data(_) => true,
            HireError::ExhaustedStrategies { last, .. } => last.is_remote(),
            HireError::Config(_) | HireError::NoStrategyAvailable(_) => false,
        }
    }
}

impl From<InvalidClientTime> for HireError {
    fn from(err: InvalidClientTime) -> Self {
        HireError::Config(err.to_string())
    }
}

impl From<InvalidLocationKey> for HireError {
    fn from(err: InvalidLocationKey) -> Self {
        HireError::Config(err.to_string())
    }
}
