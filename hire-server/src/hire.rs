//! The hire client: the caller-facing surface over the workflow API.

use std::sync::Arc;

use tracing::{info, warn};

use crate::aggregate::{aggregate_stations, extract_release_code};
use crate::domain::{ClientTime, KnownLocations, LocationKey, StationRecord, TokenSet};
use crate::error::HireError;
use crate::strategy::{
    ActiveTokenInfo, Clock, OnFailure, OnSuccess, Strategy, StrategyKind, StrategyOptions,
    SystemClock, TokenCache, TokenSource, build_plan, execute, override_label,
};
use crate::workflow::{Fragment, Operation, WorkflowApi};

/// Label used by [`HireClient::set_active_tokens`] when the caller has none.
pub const USER_SET_LABEL: &str = "user_set";

/// Fetches release codes and searches stations, managing session tokens.
///
/// One client serves one caller at a time; operations take `&mut self`.
pub struct HireClient<A> {
    api: A,
    locations: KnownLocations,
    cache: TokenCache,
    clock: Arc<dyn Clock>,
}

impl<A: WorkflowApi> HireClient<A> {
    /// Create a client with the built-in known locations and the system
    /// clock. The token cache starts empty.
    pub fn new(api: A) -> Self {
        Self {
            api,
            locations: KnownLocations::defaults(),
            cache: TokenCache::new(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_locations(mut self, locations: KnownLocations) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn locations(&self) -> &KnownLocations {
        &self.locations
    }

    /// Make a known location's example tokens the active set.
    ///
    /// Returns false when the location is missing or has no tokens.
    pub fn prime_from_known_location(&mut self, key: LocationKey) -> bool {
        let Some(location) = self.locations.get(key) else {
            warn!(location = %key, "cannot prime tokens: unknown location");
            return false;
        };

        match &location.example_tokens {
            Some(tokens) => {
                info!(location = %key, "priming active tokens from known location");
                self.cache.replace(tokens.clone());
                true
            }
            None => {
                warn!(location = %key, "cannot prime tokens: location has no example tokens");
                false
            }
        }
    }

    /// Replace the active tokens.
    pub fn set_active_tokens(
        &mut self,
        encoding: impl Into<String>,
        client_time: ClientTime,
        label: impl Into<String>,
    ) -> Result<(), HireError> {
        let encoding = encoding.into();
        if encoding.trim().is_empty() {
            return Err(HireError::Config("encoding must not be empty".to_string()));
        }
        self.cache
            .replace(TokenSet::new(encoding, client_time, label));
        Ok(())
    }

    /// Drop the active tokens. Safe to call repeatedly.
    pub fn clear_active_tokens(&mut self) {
        self.cache.clear();
    }

    pub fn active_token_info(&self) -> ActiveTokenInfo {
        self.cache.info()
    }

    /// Fetch a release code for a known location.
    ///
    /// The location's example tokens are the last resort when
    /// `try_known_location` is set.
    pub async fn release_code_for_known_location(
        &mut self,
        key: LocationKey,
        options: &StrategyOptions,
    ) -> Result<String, HireError> {
        let location = self
            .locations
            .get(key)
            .ok_or_else(|| HireError::Config(format!("unknown known location '{key}'")))?;

        let operation = Operation::ConfirmHire {
            terminal_id: location.terminal_id.clone(),
            point_name: location.display_name.clone(),
        };
        let fallback = location.example_tokens.clone();

        self.run(operation, options, fallback, parse_release_code)
            .await
    }

    /// Fetch a release code with caller-supplied tokens and nothing else.
    ///
    /// When `update_active` is set, success makes `tokens` the active set.
    pub async fn release_code_with_explicit_tokens(
        &mut self,
        terminal_id: &str,
        point_name: &str,
        tokens: TokenSet,
        update_active: bool,
    ) -> Result<String, HireError> {
        let operation = Operation::ConfirmHire {
            terminal_id: terminal_id.to_string(),
            point_name: point_name.to_string(),
        };
        let target = operation.to_string();

        let plan = vec![Strategy {
            kind: StrategyKind::ExplicitOverride,
            tokens: TokenSource::Fixed(tokens.relabel(override_label(&target))),
            on_failure: OnFailure::Abort,
            on_success: if update_active {
                OnSuccess::Persist
            } else {
                OnSuccess::Leave
            },
        }];

        let api = &self.api;
        let op = &operation;
        let outcome = execute(plan, &mut self.cache, self.clock.as_ref(), &target, |tokens| {
            attempt(api, op, tokens, parse_release_code)
        })
        .await?;
        Ok(outcome.value)
    }

    /// Search for stations by name.
    ///
    /// Searches never use the known-location fallback; pass `prime_from` to
    /// seed an empty cache instead.
    pub async fn search_stations(
        &mut self,
        text: &str,
        options: &StrategyOptions,
    ) -> Result<Vec<StationRecord>, HireError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(HireError::Config("search text must not be empty".to_string()));
        }

        let operation = Operation::Search {
            text: text.to_string(),
        };
        let stations = self.run(operation, options, None, parse_stations).await?;
        info!(query = text, stations = stations.len(), "station search complete");
        Ok(stations)
    }

    /// Fetch a release code for a station returned by a search.
    pub async fn release_code_for_search_result(
        &mut self,
        record: &StationRecord,
        options: &StrategyOptions,
    ) -> Result<String, HireError> {
        let Some(terminal_id) = record.terminal_id.as_deref().filter(|t| !t.is_empty()) else {
            return Err(HireError::Config(format!(
                "station '{}' has no terminal id and cannot be hired",
                record.name
            )));
        };

        let operation = Operation::ConfirmHire {
            terminal_id: terminal_id.to_string(),
            point_name: record.point_name.clone(),
        };
        self.run(operation, options, None, parse_release_code)
            .await
    }

    /// Prime if asked, build the plan, and run it.
    async fn run<T>(
        &mut self,
        operation: Operation,
        options: &StrategyOptions,
        fallback: Option<TokenSet>,
        parse: fn(&[Fragment]) -> Result<T, HireError>,
    ) -> Result<T, HireError> {
        let target = operation.to_string();

        if options.override_tokens.is_none()
            && let Some(key) = options.prime_from
            && self.cache.is_empty()
        {
            info!(target_op = %target, location = %key, "no active tokens, priming");
            if !self.prime_from_known_location(key) {
                warn!(target_op = %target, location = %key, "priming failed, continuing");
            }
        }

        let plan = build_plan(options, &self.cache, &target, fallback.as_ref());

        let api = &self.api;
        let op = &operation;
        let outcome = execute(plan, &mut self.cache, self.clock.as_ref(), &target, |tokens| {
            attempt(api, op, tokens, parse)
        })
        .await?;
        Ok(outcome.value)
    }
}

/// One remote call with one token set.
async fn attempt<A: WorkflowApi, T>(
    api: &A,
    operation: &Operation,
    tokens: TokenSet,
    parse: fn(&[Fragment]) -> Result<T, HireError>,
) -> Result<T, HireError> {
    let fragments = api.invoke(operation, &tokens).await?;
    parse(&fragments)
}

fn parse_release_code(fragments: &[Fragment]) -> Result<String, HireError> {
    Ok(extract_release_code(fragments)?)
}

fn parse_stations(fragments: &[Fragment]) -> Result<Vec<StationRecord>, HireError> {
    Ok(aggregate_stations(fragments))
}

#[cfg(test)]
#[path = "hire_tests.rs"]
mod tests;
