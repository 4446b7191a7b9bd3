//! Facility records as they move through the pipeline: raw source rows,
//! consolidated records, and distance-ranked selections.

use serde::{Deserialize, Serialize};

/// One row from a facility source table, before consolidation.
///
/// Descriptive fields are empty strings when the source has no such column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// Identifier as written in the source; may carry leading zeros.
    pub facility_id: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    /// Name of the source table this row came from.
    pub source_category: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub facility_type: String,
}

impl FacilityRecord {
    /// A row with only the identity and location fields populated.
    #[must_use]
    pub fn new(
        facility_id: impl Into<String>,
        source_category: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            facility_id: facility_id.into(),
            address: String::new(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            status: String::new(),
            source_category: source_category.into(),
            city: String::new(),
            region: String::new(),
            postal_code: String::new(),
            facility_type: String::new(),
        }
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// All rows read from one named source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub name: String,
    pub records: Vec<FacilityRecord>,
}

impl SourceTable {
    #[must_use]
    pub fn new(name: impl Into<String>, records: Vec<FacilityRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

/// The single surviving record for one normalized facility id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    /// Normalized id: trimmed, leading zeros stripped, all-zero ids become `"0"`.
    pub facility_id: String,
    /// Trimmed address, or empty when the winning row had no usable address.
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub facility_type: String,
}

/// A consolidated record annotated with its distance from the query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFacility {
    #[serde(flatten)]
    pub record: ConsolidatedRecord,
    /// Ellipsoidal (WGS-84) distance from the query point, full precision.
    pub distance_miles: f64,
}

impl RankedFacility {
    /// Distance rounded to two decimal places for display.
    #[must_use]
    pub fn display_distance(&self) -> f64 {
        (self.distance_miles * 100.0).round() / 100.0
    }
}

/// A query coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl QueryPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check the coordinate is finite and within WGS-84 degree bounds.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the coordinate is unusable.
    pub fn validate(&self) -> Result<(), String> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            ));
        }
        Ok(())
    }
}
