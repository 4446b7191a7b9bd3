//! Address to coordinate lookup.
//!
//! Online geocoding services sit behind the [`Geocoder`] trait. The bundled
//! [`GazetteerGeocoder`] answers from a local CSV of known addresses.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use centrefind_core::QueryPoint;
use serde::{Deserialize, Serialize};

use crate::area::GeocodedComponents;
use crate::error::SelectError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub point: QueryPoint,
    pub components: GeocodedComponents,
}

pub trait Geocoder: Send + Sync {
    /// Resolve an address. `Ok(None)` means the address is unknown.
    ///
    /// # Errors
    ///
    /// Returns `SelectError` when the lookup itself fails.
    fn geocode(&self, address: &str) -> Result<Option<GeocodedLocation>, SelectError>;
}

#[derive(Debug, Deserialize)]
struct GazetteerRow {
    address: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    city: String,
    #[serde(default)]
    county: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    postal_code: String,
}

/// Lowercased, whitespace-collapsed form used as the lookup key.
fn lookup_key(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct GazetteerGeocoder {
    entries: HashMap<String, GeocodedLocation>,
}

impl GazetteerGeocoder {
    /// Build a gazetteer from CSV with columns
    /// `address,latitude,longitude[,city,county,region,postal_code]`.
    ///
    /// Later duplicates of the same address are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::Csv`] on malformed input and
    /// [`SelectError::InvalidQuery`] for out-of-range coordinates.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SelectError> {
        let csv_err = |e: csv::Error| SelectError::Csv {
            source_name: "gazetteer".to_string(),
            source: e,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = HashMap::new();
        for result in rdr.deserialize::<GazetteerRow>() {
            let row = result.map_err(csv_err)?;
            let point = QueryPoint::new(row.latitude, row.longitude);
            point.validate().map_err(|reason| {
                SelectError::InvalidQuery(format!("gazetteer entry '{}': {reason}", row.address))
            })?;
            entries.entry(lookup_key(&row.address)).or_insert(GeocodedLocation {
                point,
                components: GeocodedComponents {
                    city: row.city,
                    county: row.county,
                    region: row.region,
                    postal_code: row.postal_code,
                },
            });
        }

        tracing::debug!(entries = entries.len(), "loaded gazetteer");
        Ok(Self { entries })
    }

    /// Load a gazetteer CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::SourceIo`] if the file cannot be opened, plus
    /// any error from [`GazetteerGeocoder::from_reader`].
    pub fn load(path: &Path) -> Result<Self, SelectError> {
        let file = std::fs::File::open(path).map_err(|e| SelectError::SourceIo {
            source_name: "gazetteer".to_string(),
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_reader(file)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Geocoder for GazetteerGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<GeocodedLocation>, SelectError> {
        Ok(self.entries.get(&lookup_key(address)).cloned())
    }
}
