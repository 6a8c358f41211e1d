//! Station reconstruction from a search results page.
//!
//! A result page describes each station with several sibling nodes that
//! share an identifier prefix (`lchs_searchresult_<n>`). Aggregation runs in
//! two phases:
//!
//! 1. [`group_fragments`] folds nodes into one accumulator per prefix, in
//!    first-seen order.
//! 2. [`resolve`] turns an accumulator into a [`StationRecord`], or rejects
//!    it when a required field is missing.
//!
//! The terminal and point name come only from the "Hire now" image. The link
//! node never supplies them, even when it carries similar tags.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::domain::StationRecord;
use crate::workflow::Fragment;

/// Node type of the station link.
pub const LINK_KIND: &str = "Node.Link";

/// Node type of the hire button image.
pub const IMAGE_KIND: &str = "Node.Media.Image";

/// Caption of the hire button image.
pub const HIRE_NOW_CAPTION: &str = "Hire now";

/// Availability shown when the link carried no subtitle.
pub const UNKNOWN_AVAILABILITY: &str = "N/A";

static GROUP_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(lchs_searchresult_(\d+))").expect("valid search result pattern")
});

/// Fields contributed by the station link node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFields {
    pub name: Option<String>,
    pub availability: Option<String>,
    pub dock_location: Option<String>,
    pub station_id: Option<String>,
}

/// Fields contributed by the "Hire now" image node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageFields {
    pub terminal_id: Option<String>,
    pub point_name: Option<String>,
    pub station_id: Option<String>,
}

/// Everything seen so far for one group key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationAccumulator {
    /// Numeric id parsed from the group key.
    pub key_id: String,
    pub link: LinkFields,
    pub image: ImageFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentKind {
    Link,
    HireImage,
    Other,
}

fn classify(fragment: &Fragment) -> FragmentKind {
    match fragment.kind.as_deref() {
        Some(LINK_KIND) => FragmentKind::Link,
        Some(IMAGE_KIND) if fragment.name.as_deref() == Some(HIRE_NOW_CAPTION) => {
            FragmentKind::HireImage
        }
        _ => FragmentKind::Other,
    }
}

/// Extract `(group key, numeric id)` from a node identifier.
pub fn group_key(id: &str) -> Option<(&str, &str)> {
    let caps = GROUP_KEY.captures(id)?;
    let key = caps.get(1)?.as_str();
    let numeric = caps.get(2)?.as_str();
    Some((key, numeric))
}

/// Phase one: fold fragments into accumulators keyed by group key.
///
/// Nodes whose identifier has no group key are page chrome and are skipped.
/// Within a kind the last node wins; kinds never overwrite each other.
pub fn group_fragments(fragments: &[Fragment]) -> Vec<(String, StationAccumulator)> {
    let mut groups: Vec<(String, StationAccumulator)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for fragment in fragments {
        let Some((key, numeric)) = group_key(fragment.id()) else {
            continue;
        };

        let slot = *index.entry(key.to_string()).or_insert_with(|| {
            groups.push((
                key.to_string(),
                StationAccumulator {
                    key_id: numeric.to_string(),
                    ..StationAccumulator::default()
                },
            ));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;

        match classify(fragment) {
            FragmentKind::Link => {
                acc.link.name = fragment.name.clone();
                acc.link.availability = fragment.subtitle.clone();
                acc.link.dock_location = fragment.tag("LCHS.DockLocation");
                if let Some(id) = fragment.tag("LCHS.StationID") {
                    acc.link.station_id = Some(id);
                }
            }
            FragmentKind::HireImage => {
                acc.image.terminal_id = fragment.tag("Terminal");
                acc.image.point_name = fragment.tag("PointName");
                if let Some(id) = fragment.tag("StationID") {
                    acc.image.station_id = Some(id);
                }
            }
            FragmentKind::Other => {}
        }
    }

    groups
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Phase two: resolve one accumulator into a record.
///
/// Station id prefers the image tag, then the link tag, then the key. Point
/// name prefers the image tag, then the link name. Returns `None` when the
/// station id, name or point name is missing.
pub fn resolve(acc: &StationAccumulator) -> Option<StationRecord> {
    let station_id = present(&acc.image.station_id)
        .or(present(&acc.link.station_id))
        .or(Some(acc.key_id.as_str()).filter(|s| !s.is_empty()))?;
    let name = present(&acc.link.name)?;
    let point_name = present(&acc.image.point_name).unwrap_or(name);

    Some(StationRecord {
        station_id: station_id.to_string(),
        name: name.to_string(),
        availability: present(&acc.link.availability)
            .unwrap_or(UNKNOWN_AVAILABILITY)
            .to_string(),
        terminal_id: present(&acc.image.terminal_id).map(str::to_string),
        point_name: point_name.to_string(),
        dock_location: present(&acc.link.dock_location).map(str::to_string),
    })
}

/// Reconstruct station records from a search response.
///
/// Incomplete groups are dropped with a warning; they never fail the search.
pub fn aggregate_stations(fragments: &[Fragment]) -> Vec<StationRecord> {
    group_fragments(fragments)
        .into_iter()
        .filter_map(|(key, acc)| {
            let record = resolve(&acc);
            if record.is_none() {
                warn!(group = %key, details = ?acc, "skipping search result: missing core data");
            }
            record
        })
        .collect()
}
