//! Scripted workflow client for tests and offline development.
//!
//! Responses are served in the order they were queued, and every call is
//! recorded so tests can assert which tokens were tried.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::TokenSet;

use super::WorkflowApi;
use super::error::WorkflowError;
use super::types::{Fragment, Operation};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub operation: Operation,
    pub tokens: TokenSet,
}

#[derive(Default)]
struct MockState {
    responses: VecDeque<Result<Vec<Fragment>, WorkflowError>>,
    calls: Vec<RecordedCall>,
}

/// Mock workflow client that replays queued responses.
///
/// Clones share the same queue and call log.
#[derive(Clone, Default)]
pub struct MockWorkflow {
    state: Arc<Mutex<MockState>>,
}

impl MockWorkflow {
    /// Create a mock with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn push_fragments(&self, fragments: Vec<Fragment>) -> &Self {
        self.lock().responses.push_back(Ok(fragments));
        self
    }

    /// Queue a failed response.
    pub fn push_failure(&self, error: WorkflowError) -> &Self {
        self.lock().responses.push_back(Err(error));
        self
    }

    /// Queue an HTTP status failure.
    pub fn push_status(&self, status: u16) -> &Self {
        self.push_failure(WorkflowError::Api {
            status,
            message: format!("scripted status {status}"),
        })
    }

    /// All calls received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Number of queued responses not yet served.
    pub fn pending(&self) -> usize {
        self.lock().responses.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked mid-call;
        // the queue itself is still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WorkflowApi for MockWorkflow {
    async fn invoke(
        &self,
        operation: &Operation,
        tokens: &TokenSet,
    ) -> Result<Vec<Fragment>, WorkflowError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            operation: operation.clone(),
            tokens: tokens.clone(),
        });
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(WorkflowError::Unscripted(operation.to_string())))
    }
}
