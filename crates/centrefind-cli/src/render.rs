//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use centrefind_core::{ConsolidatedRecord, RankedFacility};
use centrefind_select::{ConsolidationReport, NearestQuery};

use crate::commands::AreaSummary;

fn location_line(record: &ConsolidatedRecord) -> String {
    let parts: Vec<&str> = [
        record.address.as_str(),
        record.city.as_str(),
        record.region.as_str(),
        record.postal_code.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
    if parts.is_empty() {
        "(no address)".to_string()
    } else {
        parts.join(", ")
    }
}

pub(crate) fn nearest_table(
    query: &NearestQuery,
    area: Option<&AreaSummary>,
    selected: &[RankedFacility],
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Nearest {} facilities to ({:.5}, {:.5})",
        query.k, query.point.latitude, query.point.longitude
    );
    if let Some(area) = area {
        match area.radius_miles {
            Some(radius) => {
                let _ = writeln!(out, "Area: {} (map radius {radius} mi)", area.area);
            }
            None => {
                let _ = writeln!(out, "Area: {}", area.area);
            }
        }
    }
    if selected.is_empty() {
        out.push_str("No facilities found.\n");
        return out;
    }
    if selected.len() < query.k {
        let _ = writeln!(out, "Only {} distinct facilities qualified.", selected.len());
    }
    for (idx, facility) in selected.iter().enumerate() {
        let record = &facility.record;
        let _ = write!(
            out,
            "{:>3}. #{:<8} {:>8.2} mi  {}",
            idx + 1,
            record.facility_id,
            facility.display_distance(),
            location_line(record)
        );
        if !record.status.is_empty() {
            let _ = write!(out, "  [{}]", record.status);
        }
        out.push('\n');
    }
    out
}

pub(crate) fn consolidated_table(
    report: &ConsolidationReport,
    table: &[ConsolidatedRecord],
) -> String {
    let mut out = String::new();
    for record in table {
        let _ = writeln!(
            out,
            "#{:<8} {:>10.5} {:>11.5}  {}  [{}]",
            record.facility_id,
            record.latitude,
            record.longitude,
            location_line(record),
            record.status
        );
    }
    let _ = writeln!(
        out,
        "{} facilities from {} rows ({} without id, {} without coordinates, \
         {} duplicates resolved, {} statuses overridden)",
        report.output_records,
        report.input_rows,
        report.dropped_missing_id,
        report.dropped_missing_coordinates,
        report.duplicates_resolved,
        report.status_overrides
    );
    out
}
