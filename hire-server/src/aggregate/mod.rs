//! Response aggregation.
//!
//! Turns the flat fragment list of a workflow response into release codes
//! and station records.

mod release_code;
mod stations;

pub use release_code::{RELEASE_CODE_CAPTION, UNLOCK_SUFFIX, extract_release_code};
pub use stations::{
    HIRE_NOW_CAPTION, IMAGE_KIND, ImageFields, LINK_KIND, LinkFields, StationAccumulator,
    UNKNOWN_AVAILABILITY, aggregate_stations, group_fragments, group_key, resolve,
};
