//! End-to-end query: source tables in, nearest distinct facilities out.

use centrefind_core::{
    ConsolidatedRecord, ConsolidationPolicy, QueryPoint, RankedFacility, SourceTable,
};
use serde::{Deserialize, Serialize};

use crate::consolidate::consolidate;
use crate::error::SelectError;
use crate::select::select_nearest;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestQuery {
    pub point: QueryPoint,
    pub k: usize,
    pub min_separation_miles: f64,
}

impl NearestQuery {
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidQuery`] for an out-of-range point, a
    /// zero `k`, or a negative or non-finite separation.
    pub fn validate(&self) -> Result<(), SelectError> {
        self.point.validate().map_err(SelectError::InvalidQuery)?;
        if self.k == 0 {
            return Err(SelectError::InvalidQuery("k must be at least 1".to_string()));
        }
        if !self.min_separation_miles.is_finite() || self.min_separation_miles < 0.0 {
            return Err(SelectError::InvalidQuery(format!(
                "min_separation_miles must be finite and non-negative, got {}",
                self.min_separation_miles
            )));
        }
        Ok(())
    }

    /// Run the selection step against an already consolidated table.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidQuery`] if the query fails validation.
    pub fn run(&self, table: &[ConsolidatedRecord]) -> Result<Vec<RankedFacility>, SelectError> {
        self.validate()?;
        Ok(select_nearest(
            table,
            self.point,
            self.k,
            self.min_separation_miles,
        ))
    }
}

/// Consolidate `tables` and select the nearest distinct facilities.
///
/// A pure function of its arguments: nothing is cached between calls.
///
/// # Errors
///
/// Returns [`SelectError::InvalidQuery`] for a bad query, and any
/// consolidation error unchanged.
pub fn find_nearest(
    tables: &[SourceTable],
    policy: &ConsolidationPolicy,
    query: &NearestQuery,
) -> Result<Vec<RankedFacility>, SelectError> {
    query.validate()?;
    let table = consolidate(tables, policy)?;
    query.run(&table)
}
