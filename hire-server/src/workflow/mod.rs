//! Workflow API client.
//!
//! This module provides an HTTP client for the undocumented workflow API
//! behind the cycle hire app.
//!
//! Key characteristics of the API:
//! - Every response is a flat list of UI nodes ("fragments"); structure has
//!   to be recovered from node identifiers and types
//! - Requests are authenticated by a `c3-encoding` header paired with a
//!   `c3-clienttime` form field; how long a pairing stays valid is unknown
//! - Release codes are single-use and must never be cached

mod client;
mod error;
pub mod mock;
mod node;
mod types;

use std::future::Future;

use crate::domain::TokenSet;

pub use client::{DEFAULT_USER_AUTH, WorkflowClient, WorkflowConfig};
pub use error::WorkflowError;
pub use mock::MockWorkflow;
pub use node::confirm_hire_node;
pub use types::{Fragment, Operation, WorkflowResponse};

/// Performs remote operations with a given token set.
///
/// This abstraction lets the strategy engine run against a mock.
pub trait WorkflowApi: Send + Sync {
    /// Perform `operation` and return the response's fragment list.
    ///
    /// An empty list is a successful response; any transport problem is an
    /// error.
    fn invoke(
        &self,
        operation: &Operation,
        tokens: &TokenSet,
    ) -> impl Future<Output = Result<Vec<Fragment>, WorkflowError>> + Send;
}
