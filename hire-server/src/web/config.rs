//! Configuration for the web front-end.

use std::time::Duration;

use crate::domain::LocationKey;

/// Web layer settings.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// How long search results stay available for "get code".
    pub result_ttl: Duration,

    /// Maximum number of remembered search results.
    pub max_results: u64,

    /// Known location used to prime an empty cache before a search.
    pub prime_from: Option<LocationKey>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            result_ttl: Duration::from_secs(10 * 60),
            max_results: 1000,
            prime_from: Some(LocationKey::CromerStreet),
        }
    }
}

impl WebConfig {
    pub fn with_result_ttl(mut self, ttl: Duration) -> Self {
        self.result_ttl = ttl;
        self
    }

    pub fn with_prime_from(mut self, key: Option<LocationKey>) -> Self {
        self.prime_from = key;
        self
    }
}
