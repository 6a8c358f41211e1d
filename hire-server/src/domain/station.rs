//! Docking station records.

use serde::{Deserialize, Serialize};

/// A docking station reconstructed from a search response.
///
/// Records are only built by the search aggregator, which guarantees that
/// `station_id`, `name` and `point_name` are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Server-side station identifier.
    pub station_id: String,

    /// Display name, e.g. "King's Cross".
    pub name: String,

    /// Availability caption, e.g. "12 bikes". "N/A" when the server sent none.
    pub availability: String,

    /// Terminal that issues release codes. Absent when the station cannot be
    /// hired from right now.
    pub terminal_id: Option<String>,

    /// Point name sent back when confirming a hire.
    pub point_name: String,

    /// "lat,lon" of the dock, when supplied.
    pub dock_location: Option<String>,
}

impl StationRecord {
    /// Whether a release code can be requested for this station.
    pub fn is_hirable(&self) -> bool {
        self.terminal_id.as_deref().is_some_and(|t| !t.is_empty())
    }
}
