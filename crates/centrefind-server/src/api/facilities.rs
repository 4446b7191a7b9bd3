use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Serialize, Serializer};

use super::{ApiResponse, AppState, FacilityIndex, ResponseMeta};
use crate::middleware::RequestId;

/// Serializes the shared index without copying the table out of the `Arc`.
#[derive(Debug)]
pub(super) struct IndexView(Arc<FacilityIndex>);

impl Serialize for IndexView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

pub(super) async fn list_facilities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<IndexView>> {
    Json(ApiResponse {
        data: IndexView(state.index),
        meta: ResponseMeta::new(req_id.0),
    })
}
