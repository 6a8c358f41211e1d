//! The active token set of one client.

use serde::Serialize;
use tracing::info;

use crate::domain::TokenSet;

/// Holds at most one token set.
///
/// Starts empty. Changed only by explicit caller action, priming, or a
/// strategy whose success persists its tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCache {
    active: Option<TokenSet>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&TokenSet> {
        self.active.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    /// Make `tokens` the active set.
    pub fn replace(&mut self, tokens: TokenSet) {
        info!(
            source = tokens.source(),
            encoding = %tokens.encoding_preview(),
            client_time = %tokens.client_time(),
            "active tokens updated"
        );
        self.active = Some(tokens);
    }

    /// Drop the active set. Clearing an empty cache is a no-op.
    pub fn clear(&mut self) {
        if self.active.take().is_some() {
            info!("active tokens cleared");
        }
    }

    /// Read-only snapshot of the active set.
    pub fn info(&self) -> ActiveTokenInfo {
        match &self.active {
            Some(tokens) => ActiveTokenInfo {
                encoding: Some(tokens.encoding().to_string()),
                client_time: Some(tokens.client_time().to_string()),
                source: Some(tokens.source().to_string()),
            },
            None => ActiveTokenInfo::default(),
        }
    }
}

/// Snapshot of the token cache. All fields are absent when it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveTokenInfo {
    pub encoding: Option<String>,
    pub client_time: Option<String>,
    pub source: Option<String>,
}

impl ActiveTokenInfo {
    pub fn is_empty(&self) -> bool {
        self.encoding.is_none()
    }
}
