//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::hire::HireClient;

use super::config::WebConfig;
use super::results::SearchResults;

/// Shared application state.
///
/// The hire client sits behind a mutex: its operations take `&mut self`, so
/// requests touching tokens run one at a time.
pub struct AppState<A> {
    pub hire: Arc<Mutex<HireClient<A>>>,

    /// Records from recent searches
    pub results: Arc<SearchResults>,

    pub config: Arc<WebConfig>,
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            hire: Arc::clone(&self.hire),
            results: Arc::clone(&self.results),
            config: Arc::clone(&self.config),
        }
    }
}

impl<A> AppState<A> {
    pub fn new(hire: HireClient<A>, config: WebConfig) -> Self {
        Self {
            hire: Arc::new(Mutex::new(hire)),
            results: Arc::new(SearchResults::new(&config)),
            config: Arc::new(config),
        }
    }
}
