//! Web front-end for the hire client.
//!
//! Provides HTTP endpoints for searching stations, fetching release codes
//! and managing the active session tokens.

mod config;
mod dto;
mod results;
mod routes;
mod state;
pub mod templates;

pub use config::WebConfig;
pub use dto::*;
pub use results::SearchResults;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
