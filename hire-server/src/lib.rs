//! Cycle hire release-code client.
//!
//! Obtains bike release codes and searches docking stations through the
//! workflow API behind the cycle hire app. Session tokens can be neither
//! requested nor refreshed, so every operation walks a fixed chain of token
//! strategies until one is accepted.

pub mod aggregate;
pub mod domain;
pub mod error;
pub mod hire;
pub mod strategy;
pub mod web;
pub mod workflow;

pub use error::{DataError, HireError};
pub use hire::HireClient;
