//! Recently returned search results.
//!
//! The "get code" action only carries a station id, so the records from the
//! last searches are kept here for a while. Release codes are never stored.

use std::sync::Arc;

use moka::future::Cache as MokaCache;

use crate::domain::StationRecord;

use super::config::WebConfig;

/// Search results keyed by station id.
pub struct SearchResults {
    stations: MokaCache<String, Arc<StationRecord>>,
}

impl SearchResults {
    pub fn new(config: &WebConfig) -> Self {
        let stations = MokaCache::builder()
            .time_to_live(config.result_ttl)
            .max_capacity(config.max_results)
            .build();

        Self { stations }
    }

    /// Remember every record of a search. A later search replaces entries
    /// with the same station id.
    pub async fn insert_all(&self, records: &[StationRecord]) {
        for record in records {
            self.stations
                .insert(record.station_id.clone(), Arc::new(record.clone()))
                .await;
        }
    }

    pub async fn get(&self, station_id: &str) -> Option<Arc<StationRecord>> {
        self.stations.get(station_id).await
    }
}
