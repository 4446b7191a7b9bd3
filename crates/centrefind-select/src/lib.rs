//! Nearest-facility selection.
//!
//! Loads facility source tables, consolidates them into one record per
//! facility, and selects the nearest distinct facilities to a query point.

pub mod area;
pub mod consolidate;
pub mod distance;
pub mod error;
pub mod geocode;
pub mod normalize;
pub mod pipeline;
pub mod select;
pub mod table;

pub use area::{AreaClassifier, AreaType, GeocodedComponents, TableAreaClassifier};
pub use consolidate::{consolidate, consolidate_with_report, ConsolidationReport};
pub use distance::geodesic_miles;
pub use error::SelectError;
pub use geocode::{GazetteerGeocoder, GeocodedLocation, Geocoder};
pub use normalize::normalize_facility_id;
pub use pipeline::{find_nearest, NearestQuery};
pub use select::{pick_distinct, rank_by_distance, select_nearest};
pub use table::{load_all_sources, load_source_table, read_source_table};
