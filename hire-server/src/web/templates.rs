//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{KnownLocations, StationRecord};

use super::dto::TokenStatus;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with search form, known locations and token status.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub locations: Vec<LocationView>,
    pub tokens: TokenStatus,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Station list fragment (search results).
#[derive(Template)]
#[template(path = "station_list.html")]
pub struct StationListTemplate {
    pub query: String,
    pub stations: Vec<StationView>,
}

/// Release code fragment.
#[derive(Template)]
#[template(path = "release_code.html")]
pub struct ReleaseCodeTemplate {
    pub code: String,
    pub point_name: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Known location view model.
#[derive(Debug, Clone)]
pub struct LocationView {
    pub key: String,
    pub display_name: String,
    pub terminal_id: String,
    pub has_tokens: bool,
}

impl LocationView {
    pub fn from_locations(locations: &KnownLocations) -> Vec<Self> {
        locations
            .iter()
            .map(|(key, loc)| Self {
                key: key.to_string(),
                display_name: loc.display_name.clone(),
                terminal_id: loc.terminal_id.clone(),
                has_tokens: loc.example_tokens.is_some(),
            })
            .collect()
    }
}

/// Station view model.
#[derive(Debug, Clone)]
pub struct StationView {
    pub station_id: String,
    pub name: String,
    pub availability: String,
    pub point_name: String,
    pub dock_location: Option<String>,
    pub hirable: bool,
}

impl StationView {
    /// Show the point name only when it adds something to the name.
    pub fn show_point_name(&self) -> bool {
        self.point_name != self.name
    }

    pub fn from_record(record: &StationRecord) -> Self {
        Self {
            station_id: record.station_id.clone(),
            name: record.name.clone(),
            availability: record.availability.clone(),
            point_name: record.point_name.clone(),
            dock_location: record.dock_location.clone(),
            hirable: record.is_hirable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(terminal: Option<&str>) -> StationRecord {
        StationRecord {
            station_id: "7".to_string(),
            name: "King's Cross".to_string(),
            availability: "12 bikes".to_string(),
            terminal_id: terminal.map(str::to_string),
            point_name: "King's Cross, Station Rd".to_string(),
            dock_location: None,
        }
    }

    #[test]
    fn station_list_only_offers_codes_for_hirable() {
        let template = StationListTemplate {
            query: "King".to_string(),
            stations: vec![
                StationView::from_record(&record(Some("300100"))),
                StationView {
                    station_id: "8".to_string(),
                    ..StationView::from_record(&record(None))
                },
            ],
        };

        let html = template.render().unwrap();
        assert!(html.contains("/stations/7/release-code"));
        assert!(!html.contains("/stations/8/release-code"));
        assert!(html.contains("Not available for hire here"));
    }

    #[test]
    fn station_id_is_encoded_in_code_url() {
        let template = StationListTemplate {
            query: "King".to_string(),
            stations: vec![StationView {
                station_id: "BikePoints/7".to_string(),
                ..StationView::from_record(&record(Some("300100")))
            }],
        };

        let html = template.render().unwrap();
        assert!(html.contains("/stations/BikePoints%2F7/release-code"));
    }

    #[test]
    fn empty_station_list() {
        let template = StationListTemplate {
            query: "Nowhere".to_string(),
            stations: Vec::new(),
        };
        assert!(template.render().unwrap().contains("No stations found"));
    }

    #[test]
    fn point_name_shown_when_different() {
        let view = StationView::from_record(&record(Some("1")));
        assert!(view.show_point_name());

        let same = StationView {
            point_name: view.name.clone(),
            ..view
        };
        assert!(!same.show_point_name());
    }

    #[test]
    fn index_lists_locations() {
        let template = IndexTemplate {
            locations: LocationView::from_locations(&KnownLocations::defaults()),
            tokens: TokenStatus {
                active: false,
                encoding: None,
                client_time: None,
                source: None,
            },
        };

        let html = template.render().unwrap();
        assert!(html.contains("/locations/cromer_street/release-code"));
        assert!(html.contains("Warren Street Station, Euston"));
        assert!(html.contains("No active tokens"));
    }

    #[test]
    fn release_code_fragment() {
        let html = ReleaseCodeTemplate {
            code: "4821".to_string(),
            point_name: "Cromer Street, Bloomsbury".to_string(),
        }
        .render()
        .unwrap();
        assert!(html.contains("4821"));
    }
}
