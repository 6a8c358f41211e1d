//! Runs a strategy plan against a remote operation.

use std::future::Future;

use tracing::{error, info, warn};

use crate::domain::TokenSet;
use crate::error::HireError;

use super::cache::TokenCache;
use super::clock::Clock;
use super::plan::{OnFailure, OnSuccess, Strategy, StrategyKind};

/// Result of the first successful attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub kind: StrategyKind,
    pub tokens: TokenSet,
}

/// Try each strategy in order until one succeeds.
///
/// Attempts are strictly sequential. A failure moves on to the next
/// strategy unless the strategy aborts the chain. A success persists its
/// tokens into `cache` when the strategy says so.
///
/// Returns `NoStrategyAvailable` for an empty plan and
/// `ExhaustedStrategies` carrying the last failure otherwise.
pub async fn execute<T, F, Fut>(
    plan: Vec<Strategy>,
    cache: &mut TokenCache,
    clock: &dyn Clock,
    target: &str,
    mut attempt: F,
) -> Result<Outcome<T>, HireError>
where
    F: FnMut(TokenSet) -> Fut,
    Fut: Future<Output = Result<T, HireError>>,
{
    let mut last_error = None;

    for strategy in plan {
        let tokens = strategy.tokens.resolve(clock);
        info!(
            target_op = target,
            strategy = %strategy.kind,
            encoding = %tokens.encoding_preview(),
            client_time = %tokens.client_time(),
            "trying strategy"
        );

        match attempt(tokens.clone()).await {
            Ok(value) => {
                if strategy.on_success == OnSuccess::Persist {
                    cache.replace(tokens.clone());
                }
                info!(target_op = target, strategy = %strategy.kind, "strategy succeeded");
                return Ok(Outcome {
                    value,
                    kind: strategy.kind,
                    tokens,
                });
            }
            Err(err) => match strategy.on_failure {
                OnFailure::Abort => {
                    error!(target_op = target, strategy = %strategy.kind, error = %err, "strategy failed, aborting");
                    return Err(HireError::ExhaustedStrategies {
                        target: target.to_string(),
                        last: Box::new(err),
                    });
                }
                OnFailure::Continue => {
                    warn!(target_op = target, strategy = %strategy.kind, error = %err, "strategy failed");
                    last_error = Some(err);
                }
            },
        }
    }

    match last_error {
        Some(last) => Err(HireError::ExhaustedStrategies {
            target: target.to_string(),
            last: Box::new(last),
        }),
        None => Err(HireError::NoStrategyAvailable(target.to_string())),
    }
}
