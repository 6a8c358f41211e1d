//! Strategy descriptors and plan construction.

use std::fmt;

use crate::domain::{ClientTime, LocationKey, TokenSet};

use super::cache::TokenCache;
use super::clock::Clock;

/// Which token source a strategy draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    ExplicitOverride,
    ActiveOriginalTime,
    ActiveRefreshedTime,
    KnownLocationFallback,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrategyKind::ExplicitOverride => "explicit override",
            StrategyKind::ActiveOriginalTime => "active tokens, original time",
            StrategyKind::ActiveRefreshedTime => "active encoding, refreshed time",
            StrategyKind::KnownLocationFallback => "known location tokens",
        };
        f.write_str(s)
    }
}

/// What a failed attempt does to the rest of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    Abort,
    Continue,
}

/// What a successful attempt does to the token cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnSuccess {
    Persist,
    Leave,
}

/// Where an attempt's tokens come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Fixed(TokenSet),
    /// An encoding paired with the clock reading at attempt time.
    Refreshed { encoding: String, source: String },
}

impl TokenSource {
    pub fn resolve(&self, clock: &dyn Clock) -> TokenSet {
        match self {
            TokenSource::Fixed(tokens) => tokens.clone(),
            TokenSource::Refreshed { encoding, source } => {
                TokenSet::new(encoding.clone(), ClientTime::at(clock.now()), source.clone())
            }
        }
    }
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub kind: StrategyKind,
    pub tokens: TokenSource,
    pub on_failure: OnFailure,
    pub on_success: OnSuccess,
}

/// Caller switches for one operation.
///
/// The default enables every cache and fallback strategy, with no override
/// and no priming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOptions {
    /// Tokens to use for this call only. When present nothing else is tried.
    pub override_tokens: Option<TokenSet>,
    pub try_active_original_time: bool,
    pub try_active_refreshed_time: bool,
    /// Only meaningful for operations aimed at a known location.
    pub try_known_location: bool,
    /// Populate an empty cache from this location before the cache
    /// strategies run.
    pub prime_from: Option<LocationKey>,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            override_tokens: None,
            try_active_original_time: true,
            try_active_refreshed_time: true,
            try_known_location: true,
            prime_from: None,
        }
    }
}

impl StrategyOptions {
    /// Options with every strategy disabled.
    pub fn none() -> Self {
        Self {
            try_active_original_time: false,
            try_active_refreshed_time: false,
            try_known_location: false,
            ..Self::default()
        }
    }

    pub fn with_override(mut self, tokens: TokenSet) -> Self {
        self.override_tokens = Some(tokens);
        self
    }

    pub fn with_original_time(mut self, enabled: bool) -> Self {
        self.try_active_original_time = enabled;
        self
    }

    pub fn with_refreshed_time(mut self, enabled: bool) -> Self {
        self.try_active_refreshed_time = enabled;
        self
    }

    pub fn with_known_location(mut self, enabled: bool) -> Self {
        self.try_known_location = enabled;
        self
    }

    pub fn with_prime_from(mut self, key: LocationKey) -> Self {
        self.prime_from = Some(key);
        self
    }
}

/// Label for tokens supplied as a per-call override.
pub fn override_label(target: &str) -> String {
    format!("explicit_override:{target}")
}

/// Label for the active encoding paired with a fresh time.
pub fn refreshed_label(target: &str) -> String {
    format!("refreshed_time:{target}")
}

/// Lay out the strategies for one operation in priority order.
///
/// `fallback` is the known location's example tokens, supplied only for
/// operations aimed at a known location. Must be called after priming.
pub fn build_plan(
    options: &StrategyOptions,
    cache: &TokenCache,
    target: &str,
    fallback: Option<&TokenSet>,
) -> Vec<Strategy> {
    if let Some(tokens) = &options.override_tokens {
        return vec![Strategy {
            kind: StrategyKind::ExplicitOverride,
            tokens: TokenSource::Fixed(tokens.relabel(override_label(target))),
            on_failure: OnFailure::Abort,
            on_success: OnSuccess::Persist,
        }];
    }

    let mut plan = Vec::new();

    if let Some(active) = cache.active() {
        if options.try_active_original_time {
            plan.push(Strategy {
                kind: StrategyKind::ActiveOriginalTime,
                tokens: TokenSource::Fixed(active.clone()),
                on_failure: OnFailure::Continue,
                on_success: OnSuccess::Leave,
            });
        }

        if options.try_active_refreshed_time {
            plan.push(Strategy {
                kind: StrategyKind::ActiveRefreshedTime,
                tokens: TokenSource::Refreshed {
                    encoding: active.encoding().to_string(),
                    source: refreshed_label(target),
                },
                on_failure: OnFailure::Continue,
                on_success: OnSuccess::Persist,
            });
        }
    }

    if options.try_known_location
        && let Some(tokens) = fallback
    {
        plan.push(Strategy {
            kind: StrategyKind::KnownLocationFallback,
            tokens: TokenSource::Fixed(tokens.clone()),
            on_failure: OnFailure::Continue,
            on_success: OnSuccess::Persist,
        });
    }

    plan
}
