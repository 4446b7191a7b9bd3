//! Reading facility source tables from CSV.
//!
//! Each source is one CSV file with a header row. Logical fields are located
//! through a [`ColumnMapping`] of accepted header names; required columns
//! that cannot be located abort the load with the source and column named.

use std::io::Read;

use centrefind_core::{ColumnMapping, FacilityRecord, SourceConfig, SourceTable, SourcesFile};

use crate::error::SelectError;

/// Resolved column positions for one CSV header row.
#[derive(Debug)]
struct ColumnIndex {
    facility_id: usize,
    latitude: usize,
    longitude: usize,
    address: Option<usize>,
    status: Option<usize>,
    city: Option<usize>,
    region: Option<usize>,
    postal_code: Option<usize>,
    facility_type: Option<usize>,
}

fn find_column(headers: &csv::StringRecord, accepted: &[String]) -> Option<usize> {
    accepted.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
    })
}

impl ColumnIndex {
    fn resolve(
        source_name: &str,
        headers: &csv::StringRecord,
        mapping: &ColumnMapping,
    ) -> Result<Self, SelectError> {
        let require = |column: &'static str, accepted: &[String]| {
            find_column(headers, accepted).ok_or_else(|| SelectError::MissingColumn {
                source_name: source_name.to_string(),
                column,
                accepted: accepted.join(", "),
            })
        };

        Ok(Self {
            facility_id: require("facility_id", &mapping.facility_id)?,
            latitude: require("latitude", &mapping.latitude)?,
            longitude: require("longitude", &mapping.longitude)?,
            address: find_column(headers, &mapping.address),
            status: find_column(headers, &mapping.status),
            city: find_column(headers, &mapping.city),
            region: find_column(headers, &mapping.region),
            postal_code: find_column(headers, &mapping.postal_code),
            facility_type: find_column(headers, &mapping.facility_type),
        })
    }
}

fn text(row: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Parse a coordinate cell; blank or unparseable cells are treated as missing.
fn coordinate(row: &csv::StringRecord, idx: usize) -> Option<f64> {
    row.get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Read one source table from any CSV reader.
///
/// # Errors
///
/// Returns [`SelectError::MissingColumn`] when a required column is absent
/// and [`SelectError::Csv`] when the CSV itself is malformed.
pub fn read_source_table<R: Read>(
    source_name: &str,
    reader: R,
    mapping: &ColumnMapping,
) -> Result<SourceTable, SelectError> {
    let csv_err = |e: csv::Error| SelectError::Csv {
        source_name: source_name.to_string(),
        source: e,
    };

    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let columns = ColumnIndex::resolve(source_name, &headers, mapping)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(csv_err)?;
        records.push(FacilityRecord {
            facility_id: text(&row, Some(columns.facility_id)),
            address: text(&row, columns.address),
            latitude: coordinate(&row, columns.latitude),
            longitude: coordinate(&row, columns.longitude),
            status: text(&row, columns.status),
            source_category: source_name.to_string(),
            city: text(&row, columns.city),
            region: text(&row, columns.region),
            postal_code: text(&row, columns.postal_code),
            facility_type: text(&row, columns.facility_type),
        });
    }

    tracing::info!(source = %source_name, rows = records.len(), "read source table");
    Ok(SourceTable::new(source_name, records))
}

/// Open and read the CSV file named by a source config entry.
///
/// # Errors
///
/// Returns [`SelectError::SourceIo`] if the file cannot be opened, plus any
/// error from [`read_source_table`].
pub fn load_source_table(source: &SourceConfig) -> Result<SourceTable, SelectError> {
    let file = std::fs::File::open(&source.path).map_err(|e| SelectError::SourceIo {
        source_name: source.name.clone(),
        path: source.path.display().to_string(),
        source: e,
    })?;
    read_source_table(&source.name, file, &source.column_mapping())
}

/// Load every configured source, in priority order.
///
/// A failure in any one source aborts the whole load.
///
/// # Errors
///
/// Returns the first error from [`load_source_table`].
pub fn load_all_sources(sources: &SourcesFile) -> Result<Vec<SourceTable>, SelectError> {
    sources.sources.iter().map(load_source_table).collect()
}
