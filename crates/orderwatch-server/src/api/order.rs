use axum::{extract::State, Extension, Json};
use orderwatch_client::{normalize_order, RawOrder};
use orderwatch_core::OrderSummary;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_client_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct SummaryLine {
    label: &'static str,
    value: String,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderData {
    summary: OrderSummary,
    lines: Vec<SummaryLine>,
    raw: RawOrder,
}

pub(super) async fn get_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<OrderData>>, ApiError> {
    let raw = state
        .client
        .fetch_order()
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    let summary = normalize_order(&raw);
    let lines = summary
        .lines()
        .into_iter()
        .map(|(label, value)| SummaryLine {
            label,
            value: value.to_string(),
        })
        .collect();

    Ok(Json(ApiResponse {
        data: OrderData {
            summary,
            lines,
            raw,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
