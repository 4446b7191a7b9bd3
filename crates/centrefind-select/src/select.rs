//! Nearest-K selection with a minimum distance separation.
//!
//! Candidates are ranked by geodesic distance, then accepted greedily: a
//! candidate is skipped when its facility id was already accepted, or when
//! its distance lies within `min_separation_miles` of any accepted distance.
//! Two facilities that close to each other in distance are treated as the
//! same place listed twice.

use std::collections::HashSet;

use centrefind_core::{ConsolidatedRecord, QueryPoint, RankedFacility};

use crate::distance::geodesic_miles;
use crate::normalize::normalize_facility_id;

/// Annotate every record with its distance from `query`, nearest first.
///
/// The sort is stable, so equal distances keep table order. Records whose
/// distance cannot be computed are left out.
#[must_use]
pub fn rank_by_distance(table: &[ConsolidatedRecord], query: QueryPoint) -> Vec<RankedFacility> {
    let mut ranked: Vec<RankedFacility> = table
        .iter()
        .filter_map(|record| {
            let distance_miles = geodesic_miles(query, record.latitude, record.longitude);
            if distance_miles.is_finite() {
                Some(RankedFacility {
                    record: record.clone(),
                    distance_miles,
                })
            } else {
                tracing::warn!(
                    facility_id = %record.facility_id,
                    "skipping facility with non-finite distance"
                );
                None
            }
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    ranked
}

/// Greedily accept up to `k` distinct candidates from an ascending sequence.
///
/// A distance exactly `min_separation_miles` away from an accepted one is
/// still rejected, so a separation of zero filters identical distances only.
/// Negative or non-finite separations are treated as zero.
#[must_use]
pub fn pick_distinct<I>(ranked: I, k: usize, min_separation_miles: f64) -> Vec<RankedFacility>
where
    I: IntoIterator<Item = RankedFacility>,
{
    let separation = if min_separation_miles.is_finite() {
        min_separation_miles.max(0.0)
    } else {
        0.0
    };

    let mut selected: Vec<RankedFacility> = Vec::with_capacity(k);
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_distances: Vec<f64> = Vec::with_capacity(k);

    for candidate in ranked {
        if selected.len() >= k {
            break;
        }
        let id = normalize_facility_id(&candidate.record.facility_id)
            .unwrap_or_else(|| candidate.record.facility_id.clone());
        if seen_ids.contains(&id) {
            continue;
        }
        if seen_distances
            .iter()
            .any(|d| (d - candidate.distance_miles).abs() <= separation)
        {
            continue;
        }
        seen_ids.insert(id);
        seen_distances.push(candidate.distance_miles);
        selected.push(candidate);
    }

    selected
}

/// Select up to `k` nearest distinct facilities around `query`.
///
/// Returns fewer than `k` results (possibly none) when not enough records
/// qualify; that is not an error.
#[must_use]
pub fn select_nearest(
    table: &[ConsolidatedRecord],
    query: QueryPoint,
    k: usize,
    min_separation_miles: f64,
) -> Vec<RankedFacility> {
    if k == 0 || table.is_empty() {
        return Vec::new();
    }
    let selected = pick_distinct(rank_by_distance(table, query), k, min_separation_miles);
    tracing::debug!(
        candidates = table.len(),
        k,
        accepted = selected.len(),
        "selected nearest facilities"
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, latitude: f64, longitude: f64) -> ConsolidatedRecord {
        ConsolidatedRecord {
            facility_id: id.to_string(),
            address: format!("{id} Test Street"),
            latitude,
            longitude,
            status: String::new(),
            city: String::new(),
            region: String::new(),
            postal_code: String::new(),
            facility_type: String::new(),
        }
    }

    fn at_distance(id: &str, distance_miles: f64) -> RankedFacility {
        RankedFacility {
            record: record(id, 0.0, 0.0),
            distance_miles,
        }
    }

    fn distances(selected: &[RankedFacility]) -> Vec<f64> {
        selected.iter().map(|r| r.distance_miles).collect()
    }

    const ORIGIN: QueryPoint = QueryPoint {
        latitude: 51.5,
        longitude: -0.12,
    };

    #[test]
    fn separation_scenario_returns_two_of_three() {
        let ranked = vec![
            at_distance("1", 0.10),
            at_distance("2", 0.10),
            at_distance("3", 0.12),
            at_distance("4", 0.30),
            at_distance("5", 0.30),
        ];
        let selected = pick_distinct(ranked, 3, 0.05);
        assert_eq!(distances(&selected), vec![0.10, 0.30]);
        assert_eq!(selected[0].record.facility_id, "1");
        assert_eq!(selected[1].record.facility_id, "4");
    }

    #[test]
    fn separation_is_checked_against_every_accepted_distance() {
        // 0.24 is well clear of 0.10 but within 0.05 of the accepted 0.20.
        let ranked = vec![
            at_distance("1", 0.10),
            at_distance("2", 0.20),
            at_distance("3", 0.24),
            at_distance("4", 0.26),
        ];
        let selected = pick_distinct(ranked, 10, 0.05);
        assert_eq!(distances(&selected), vec![0.10, 0.20, 0.26]);
    }

    #[test]
    fn duplicate_ids_are_skipped() {
        let ranked = vec![
            at_distance("7", 1.0),
            at_distance("007", 2.0),
            at_distance("8", 3.0),
        ];
        let selected = pick_distinct(ranked, 3, 0.0);
        let ids: Vec<&str> = selected
            .iter()
            .map(|r| r.record.facility_id.as_str())
            .collect();
        assert_eq!(ids, vec!["7", "8"]);
    }

    #[test]
    fn zero_separation_still_filters_identical_distances() {
        let ranked = vec![
            at_distance("1", 0.5),
            at_distance("2", 0.5),
            at_distance("3", 0.500_001),
        ];
        let selected = pick_distinct(ranked, 5, 0.0);
        assert_eq!(distances(&selected), vec![0.5, 0.500_001]);
    }

    #[test]
    fn negative_separation_behaves_like_zero() {
        let ranked = vec![at_distance("1", 0.5), at_distance("2", 0.5)];
        assert_eq!(pick_distinct(ranked, 5, -1.0).len(), 1);
    }

    #[test]
    fn stops_at_k() {
        let ranked = (1..=10).map(|i| at_distance(&i.to_string(), f64::from(i)));
        let selected = pick_distinct(ranked, 4, 0.5);
        assert_eq!(distances(&selected), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn empty_table_selects_nothing() {
        for k in [1, 5, 8, 100] {
            assert!(select_nearest(&[], ORIGIN, k, 0.005).is_empty());
        }
    }

    #[test]
    fn k_zero_selects_nothing() {
        let table = vec![record("1", 51.5, -0.11)];
        assert!(select_nearest(&table, ORIGIN, 0, 0.005).is_empty());
    }

    #[test]
    fn k_larger_than_table_returns_all_qualifying() {
        let table = vec![
            record("1", 51.51, -0.12),
            record("2", 51.60, -0.12),
            record("3", 51.70, -0.12),
        ];
        let selected = select_nearest(&table, ORIGIN, 8, 0.005);
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn results_are_nearest_first() {
        let table = vec![
            record("far", 52.5, -0.12),
            record("near", 51.51, -0.12),
            record("mid", 51.9, -0.12),
        ];
        let selected = select_nearest(&table, ORIGIN, 3, 0.005);
        let ids: Vec<&str> = selected
            .iter()
            .map(|r| r.record.facility_id.as_str())
            .collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(selected
            .windows(2)
            .all(|w| w[0].distance_miles <= w[1].distance_miles));
    }

    #[test]
    fn identical_coordinates_keep_first_in_table_order() {
        let table = vec![
            record("first", 51.6, -0.12),
            record("second", 51.6, -0.12),
            record("other", 51.8, -0.12),
        ];
        let selected = select_nearest(&table, ORIGIN, 5, 0.005);
        let ids: Vec<&str> = selected
            .iter()
            .map(|r| r.record.facility_id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "other"]);
    }

    #[test]
    fn accepted_pairs_respect_separation() {
        let table: Vec<ConsolidatedRecord> = (0..40)
            .map(|i| {
                let offset = f64::from(i) * 0.001;
                record(&i.to_string(), 51.5 + offset, -0.12 + offset)
            })
            .collect();
        let separation = 0.25;
        let selected = select_nearest(&table, ORIGIN, 8, separation);
        assert!(!selected.is_empty());
        for (i, a) in selected.iter().enumerate() {
            for b in &selected[i + 1..] {
                assert!((a.distance_miles - b.distance_miles).abs() >= separation);
            }
        }
    }

    #[test]
    fn rank_by_distance_is_stable_for_ties() {
        let table = vec![
            record("a", 51.6, -0.12),
            record("b", 51.6, -0.12),
            record("c", 51.6, -0.12),
        ];
        let ranked = rank_by_distance(&table, ORIGIN);
        let ids: Vec<&str> = ranked
            .iter()
            .map(|r| r.record.facility_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
