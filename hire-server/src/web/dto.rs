//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{StationRecord, preview};
use crate::strategy::ActiveTokenInfo;

/// Query for a station search.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Search text
    pub q: String,

    /// Override encoding for this search only
    pub encoding: Option<String>,

    /// Client time paired with `encoding`
    pub client_time: Option<String>,
}

/// A station in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationResult {
    pub station_id: String,
    pub name: String,
    pub availability: String,
    pub terminal_id: Option<String>,
    pub point_name: String,
    pub dock_location: Option<String>,

    /// Whether a release code can be requested
    pub hirable: bool,
}

/// Response for a station search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub query: String,
    pub stations: Vec<StationResult>,
}

/// Response carrying a release code.
#[derive(Debug, Serialize)]
pub struct ReleaseCodeResponse {
    pub code: String,

    /// Where the bike is released
    pub point_name: String,
}

/// Request to replace the active tokens.
#[derive(Debug, Deserialize)]
pub struct SetTokensRequest {
    pub encoding: String,
    pub client_time: String,

    /// Provenance label; defaults to "user_set"
    pub label: Option<String>,
}

/// The active tokens, with the encoding shortened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenStatus {
    pub active: bool,
    pub encoding: Option<String>,
    pub client_time: Option<String>,
    pub source: Option<String>,
}

/// Result of priming from a known location.
#[derive(Debug, Serialize)]
pub struct PrimeResponse {
    pub primed: bool,
    pub tokens: TokenStatus,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<&StationRecord> for StationResult {
    fn from(record: &StationRecord) -> Self {
        Self {
            station_id: record.station_id.clone(),
            name: record.name.clone(),
            availability: record.availability.clone(),
            terminal_id: record.terminal_id.clone(),
            point_name: record.point_name.clone(),
            dock_location: record.dock_location.clone(),
            hirable: record.is_hirable(),
        }
    }
}

impl From<ActiveTokenInfo> for TokenStatus {
    fn from(info: ActiveTokenInfo) -> Self {
        Self {
            active: !info.is_empty(),
            encoding: info.encoding.as_deref().map(preview),
            client_time: info.client_time,
            source: info.source,
        }
    }
}
