//! Domain types for the cycle hire client.
//!
//! Token sets, known locations and station records. Types that carry a
//! textual format validate it at construction time.

mod location;
mod station;
mod tokens;

pub use location::{
    InvalidLocationKey, KnownLocation, KnownLocations, LocationKey, LocationsError, example_label,
};
pub use station::StationRecord;
pub use tokens::{ClientTime, InvalidClientTime, TokenSet, preview};
