//! Command handlers. Every run re-reads the source tables from disk.

use std::path::Path;

use anyhow::Context;
use centrefind_core::{load_sources, AppConfig, QueryPoint, SourceTable, SourcesFile};
use centrefind_select::{
    consolidate_with_report, load_all_sources, AreaClassifier, GazetteerGeocoder, Geocoder,
    GeocodedComponents, NearestQuery, TableAreaClassifier,
};

use crate::render;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum QueryTarget {
    Point { lat: f64, lon: f64 },
    Address(String),
}

#[derive(Debug, Clone)]
pub(crate) struct NearestArgs {
    pub target: QueryTarget,
    pub k: usize,
    pub min_separation_miles: f64,
    pub json: bool,
}

/// Area and map radius reported next to a result, when a classifier is set up.
#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct AreaSummary {
    pub area: centrefind_select::AreaType,
    pub radius_miles: Option<f64>,
}

fn load_tables(sources_path: &Path) -> anyhow::Result<(SourcesFile, Vec<SourceTable>)> {
    let sources = load_sources(sources_path)
        .with_context(|| format!("loading sources file {}", sources_path.display()))?;
    let tables = load_all_sources(&sources)?;
    Ok((sources, tables))
}

fn classify(
    config: &AppConfig,
    components: &GeocodedComponents,
) -> anyhow::Result<Option<AreaSummary>> {
    let Some(path) = config.areas_path.as_deref() else {
        return Ok(None);
    };
    let classifier = TableAreaClassifier::load(path)?;
    let area = classifier.classify_area(components);
    Ok(Some(AreaSummary {
        area,
        radius_miles: classifier.map_radius_miles(area),
    }))
}

/// Resolve the query target to a point plus any area classification.
///
/// Returns `Ok(None)` when an address is not in the gazetteer.
fn resolve_target(
    config: &AppConfig,
    target: &QueryTarget,
) -> anyhow::Result<Option<(QueryPoint, Option<AreaSummary>)>> {
    match target {
        QueryTarget::Point { lat, lon } => Ok(Some((QueryPoint::new(*lat, *lon), None))),
        QueryTarget::Address(address) => {
            let path = config.gazetteer_path.as_deref().ok_or_else(|| {
                anyhow::anyhow!(
                    "no gazetteer configured; set CENTREFIND_GAZETTEER_PATH or pass --lat/--lon"
                )
            })?;
            let geocoder = GazetteerGeocoder::load(path)?;
            let Some(location) = geocoder.geocode(address)? else {
                return Ok(None);
            };
            let area = classify(config, &location.components)?;
            Ok(Some((location.point, area)))
        }
    }
}

/// Select and print the nearest facilities.
///
/// # Errors
///
/// Returns an error for an invalid query or any source loading or
/// consolidation failure.
pub(crate) fn run_nearest(
    config: &AppConfig,
    sources_path: &Path,
    args: &NearestArgs,
) -> anyhow::Result<()> {
    let Some((point, area)) = resolve_target(config, &args.target)? else {
        if let QueryTarget::Address(address) = &args.target {
            println!("address not found: {address}");
        }
        return Ok(());
    };

    let query = NearestQuery {
        point,
        k: args.k,
        min_separation_miles: args.min_separation_miles,
    };
    query.validate()?;

    let (sources, tables) = load_tables(sources_path)?;
    let (table, _) = consolidate_with_report(&tables, &sources.consolidation_policy())?;
    let selected = query.run(&table)?;

    if args.json {
        let body = serde_json::json!({
            "query": query,
            "area": area,
            "facilities": selected,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render::nearest_table(&query, area.as_ref(), &selected));
    }
    Ok(())
}

/// Print the consolidated table and what consolidation did.
///
/// # Errors
///
/// Returns an error on any source loading or consolidation failure.
pub(crate) fn run_consolidate(sources_path: &Path, json: bool) -> anyhow::Result<()> {
    let (sources, tables) = load_tables(sources_path)?;
    let (table, report) = consolidate_with_report(&tables, &sources.consolidation_policy())?;

    if json {
        let body = serde_json::json!({ "report": report, "facilities": table });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render::consolidated_table(&report, &table));
    }
    Ok(())
}

/// Load everything a query needs and report what was found.
///
/// # Errors
///
/// Returns the first configuration problem encountered.
pub(crate) fn run_check_config(config: &AppConfig, sources_path: &Path) -> anyhow::Result<()> {
    let (sources, tables) = load_tables(sources_path)?;
    for table in &tables {
        println!("source '{}': {} rows", table.name, table.records.len());
    }
    let policy = sources.consolidation_policy();
    if let Some(status_source) = policy.effective_status_source() {
        println!("status source: {status_source}");
    }
    let (table, report) = consolidate_with_report(&tables, &policy)?;
    println!(
        "consolidated: {} facilities from {} rows",
        table.len(),
        report.input_rows
    );

    if let Some(path) = config.areas_path.as_deref() {
        let classifier = TableAreaClassifier::load(path)?;
        println!("area rules: {}", classifier.areas.len());
    }
    if let Some(path) = config.gazetteer_path.as_deref() {
        let geocoder = GazetteerGeocoder::load(path)?;
        println!("gazetteer entries: {}", geocoder.len());
    }
    Ok(())
}
