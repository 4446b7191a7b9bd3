//! Record consolidation: many source tables in, one record per facility out.
//!
//! Rows are first normalized and filtered (blank id, unusable coordinates).
//! Rows sharing a normalized id then go through the duplicate policy:
//!
//! 1. rows without a usable address are dropped when a sibling has one;
//! 2. within each `(id, address)` group, rows with a preferred status win;
//! 3. the row from the highest-priority source survives, earlier rows
//!    breaking ties;
//! 4. the survivor's status is replaced by the status source's value.
//!
//! Steps 1, 2 and 4 can each be switched off through [`PolicyToggles`].
//!
//! [`PolicyToggles`]: centrefind_core::PolicyToggles

use std::collections::{HashMap, HashSet};

use centrefind_core::{ConsolidatedRecord, ConsolidationPolicy, FacilityRecord, SourceTable};
use serde::Serialize;

use crate::error::SelectError;
use crate::normalize::{address_key, clean_address, is_valid_address, normalize_facility_id};

/// Counters describing what a consolidation run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidationReport {
    pub input_rows: usize,
    pub dropped_missing_id: usize,
    pub dropped_missing_coordinates: usize,
    pub invalid_address_rows_discarded: usize,
    pub non_preferred_rows_discarded: usize,
    pub duplicates_resolved: usize,
    pub status_overrides: usize,
    pub output_records: usize,
}

/// A row that survived filtering, tagged with what the policy needs.
#[derive(Debug)]
struct Candidate<'a> {
    order: usize,
    priority: usize,
    record: &'a FacilityRecord,
}

fn usable_coordinates(record: &FacilityRecord) -> Option<(f64, f64)> {
    let lat = record.latitude.filter(|v| v.is_finite() && (-90.0..=90.0).contains(v))?;
    let lon = record
        .longitude
        .filter(|v| v.is_finite() && (-180.0..=180.0).contains(v))?;
    Some((lat, lon))
}

/// Source category a row ranks under: its own tag, else its table's name.
fn category_of<'a>(table: &'a SourceTable, record: &'a FacilityRecord) -> &'a str {
    let category = record.source_category.trim();
    if category.is_empty() {
        &table.name
    } else {
        category
    }
}

/// Status per normalized id from the status source, first non-blank value wins.
///
/// Built from every row tagged with that source, before any duplicate filtering.
fn status_map(tables: &[SourceTable], status_source: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for record in tables.iter().flat_map(|t| {
        t.records
            .iter()
            .filter(move |r| category_of(t, r) == status_source)
    }) {
        let status = record.status.trim();
        if status.is_empty() {
            continue;
        }
        if let Some(id) = normalize_facility_id(&record.facility_id) {
            map.entry(id).or_insert_with(|| status.to_string());
        }
    }
    map
}

/// Consolidate source tables into one record per normalized facility id.
///
/// # Errors
///
/// Returns [`SelectError::DuplicateSource`] when two tables share a name,
/// since their relative priority would be ambiguous.
pub fn consolidate(
    tables: &[SourceTable],
    policy: &ConsolidationPolicy,
) -> Result<Vec<ConsolidatedRecord>, SelectError> {
    consolidate_with_report(tables, policy).map(|(records, _)| records)
}

/// Like [`consolidate`], also returning counters for logging and display.
///
/// Output order is the order in which each facility id first appears across
/// the tables, so repeated runs over the same input are identical.
///
/// # Errors
///
/// Returns [`SelectError::DuplicateSource`] when two tables share a name.
pub fn consolidate_with_report(
    tables: &[SourceTable],
    policy: &ConsolidationPolicy,
) -> Result<(Vec<ConsolidatedRecord>, ConsolidationReport), SelectError> {
    let mut seen_sources = HashSet::new();
    for table in tables {
        if !seen_sources.insert(table.name.as_str()) {
            return Err(SelectError::DuplicateSource(table.name.clone()));
        }
    }

    let mut unlisted = HashSet::new();
    for (table, record) in tables
        .iter()
        .flat_map(|t| t.records.iter().map(move |r| (t, r)))
    {
        let category = category_of(table, record);
        if !policy.source_priority.iter().any(|s| s == category) && unlisted.insert(category) {
            tracing::warn!(
                source = %category,
                "source not in priority list; ranking it last"
            );
        }
    }

    let mut report = ConsolidationReport::default();

    // Ids in first-appearance order, each with its candidate rows.
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Candidate<'_>>)> = Vec::new();

    let mut order = 0usize;
    for table in tables {
        for record in &table.records {
            report.input_rows += 1;
            order += 1;
            let priority = policy.priority_of(category_of(table, record));

            let Some(id) = normalize_facility_id(&record.facility_id) else {
                report.dropped_missing_id += 1;
                tracing::debug!(source = %table.name, "dropping row with blank facility id");
                continue;
            };
            if usable_coordinates(record).is_none() {
                report.dropped_missing_coordinates += 1;
                tracing::debug!(
                    source = %table.name,
                    facility_id = %id,
                    "dropping row without usable coordinates"
                );
                continue;
            }

            let candidate = Candidate {
                order,
                priority,
                record,
            };
            if let Some(&idx) = group_index.get(&id) {
                groups[idx].1.push(candidate);
            } else {
                group_index.insert(id.clone(), groups.len());
                groups.push((id, vec![candidate]));
            }
        }
    }

    let statuses = match policy.effective_status_source() {
        Some(source) if policy.toggles.status_override => status_map(tables, source),
        _ => HashMap::new(),
    };

    let mut consolidated = Vec::with_capacity(groups.len());
    for (id, mut candidates) in groups {
        if policy.toggles.prefer_valid_address {
            report.invalid_address_rows_discarded += drop_invalid_addresses(&mut candidates);
        }
        if policy.toggles.preferred_status_pass {
            report.non_preferred_rows_discarded += keep_preferred_statuses(&mut candidates, policy);
        }

        report.duplicates_resolved += candidates.len().saturating_sub(1);
        let Some(winner) = candidates
            .into_iter()
            .min_by_key(|c| (c.priority, c.order))
        else {
            continue;
        };

        let mut record = to_consolidated(id, winner.record);
        if let Some(status) = statuses.get(&record.facility_id) {
            if *status != record.status {
                report.status_overrides += 1;
                record.status.clone_from(status);
            }
        }
        consolidated.push(record);
    }

    report.output_records = consolidated.len();
    tracing::info!(
        input_rows = report.input_rows,
        output_records = report.output_records,
        dropped_missing_id = report.dropped_missing_id,
        dropped_missing_coordinates = report.dropped_missing_coordinates,
        duplicates_resolved = report.duplicates_resolved,
        status_overrides = report.status_overrides,
        "consolidated facility sources"
    );

    Ok((consolidated, report))
}

/// Drop rows without a usable address when at least one sibling has one.
///
/// Never empties the group. Returns the number of rows removed.
fn drop_invalid_addresses(candidates: &mut Vec<Candidate<'_>>) -> usize {
    if candidates.len() < 2
        || !candidates
            .iter()
            .any(|c| is_valid_address(&c.record.address))
    {
        return 0;
    }
    let before = candidates.len();
    candidates.retain(|c| is_valid_address(&c.record.address));
    before - candidates.len()
}

/// Within each address group, keep only preferred-status rows if any exist.
///
/// Narrows groups; a group without preferred rows is kept whole. Returns the
/// number of rows removed.
fn keep_preferred_statuses(
    candidates: &mut Vec<Candidate<'_>>,
    policy: &ConsolidationPolicy,
) -> usize {
    if candidates.len() < 2 || policy.preferred_statuses.is_empty() {
        return 0;
    }
    let preferred_addresses: HashSet<String> = candidates
        .iter()
        .filter(|c| policy.is_preferred_status(&c.record.status))
        .map(|c| address_key(&c.record.address))
        .collect();
    if preferred_addresses.is_empty() {
        return 0;
    }
    let before = candidates.len();
    candidates.retain(|c| {
        !preferred_addresses.contains(&address_key(&c.record.address))
            || policy.is_preferred_status(&c.record.status)
    });
    before - candidates.len()
}

fn to_consolidated(facility_id: String, record: &FacilityRecord) -> ConsolidatedRecord {
    let (latitude, longitude) = usable_coordinates(record).unwrap_or_default();
    ConsolidatedRecord {
        facility_id,
        address: clean_address(&record.address),
        latitude,
        longitude,
        status: record.status.trim().to_string(),
        city: record.city.trim().to_string(),
        region: record.region.trim().to_string(),
        postal_code: record.postal_code.trim().to_string(),
        facility_type: record.facility_type.trim().to_string(),
    }
}

#[cfg(test)]
#[path = "consolidate_test.rs"]
mod tests;
