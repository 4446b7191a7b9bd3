use axum::{
    extract::{Query, State},
    Extension, Json,
};
use centrefind_core::{QueryPoint, RankedFacility};
use centrefind_select::{AreaType, GeocodedComponents, NearestQuery, SelectError};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct NearestParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub address: Option<String>,
    pub k: Option<usize>,
    pub min_separation_miles: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct AreaSummary {
    pub area: AreaType,
    pub radius_miles: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct NearestData {
    pub query: NearestQuery,
    pub area: Option<AreaSummary>,
    pub facilities: Vec<RankedFacility>,
}

fn classify(state: &AppState, components: &GeocodedComponents) -> Option<AreaSummary> {
    state.classifier.as_ref().map(|classifier| {
        let area = classifier.classify_area(components);
        AreaSummary {
            area,
            radius_miles: classifier.map_radius_miles(area),
        }
    })
}

/// Resolve `lat`/`lon` or `address` to a query point.
fn resolve_point(
    state: &AppState,
    params: &NearestParams,
    req_id: &str,
) -> Result<(QueryPoint, Option<AreaSummary>), ApiError> {
    match (params.lat, params.lon, params.address.as_deref()) {
        (Some(lat), Some(lon), None) => Ok((QueryPoint::new(lat, lon), None)),
        (None, None, Some(address)) => {
            let Some(geocoder) = state.geocoder.as_ref() else {
                return Err(ApiError::new(
                    req_id,
                    "bad_request",
                    "address lookup is not configured; query by lat and lon",
                ));
            };
            let location = geocoder.geocode(address).map_err(|e| {
                tracing::error!(error = %e, "geocoder lookup failed");
                ApiError::new(req_id, "internal_error", "address lookup failed")
            })?;
            let Some(location) = location else {
                return Err(ApiError::new(
                    req_id,
                    "not_found",
                    format!("address not found: {address}"),
                ));
            };
            let area = classify(state, &location.components);
            Ok((location.point, area))
        }
        _ => Err(ApiError::new(
            req_id,
            "bad_request",
            "provide both lat and lon, or address",
        )),
    }
}

pub(super) async fn find_nearest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<NearestParams>,
) -> Result<Json<ApiResponse<NearestData>>, ApiError> {
    let (point, area) = resolve_point(&state, &params, &req_id.0)?;
    let query = NearestQuery {
        point,
        k: params.k.unwrap_or(state.defaults.k),
        min_separation_miles: params
            .min_separation_miles
            .unwrap_or(state.defaults.min_separation_miles),
    };

    let facilities = query.run(&state.index.records).map_err(|e| match e {
        SelectError::InvalidQuery(message) => {
            ApiError::new(&req_id.0, "validation_error", message)
        }
        other => {
            tracing::error!(error = %other, "nearest selection failed");
            ApiError::new(&req_id.0, "internal_error", "selection failed")
        }
    })?;

    tracing::debug!(
        latitude = query.point.latitude,
        longitude = query.point.longitude,
        k = query.k,
        returned = facilities.len(),
        "nearest query served"
    );

    Ok(Json(ApiResponse {
        data: NearestData {
            query,
            area,
            facilities,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
