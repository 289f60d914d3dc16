use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension,
};
use orderwatch_client::normalize_order;
use serde_json::Value;

use crate::middleware::RequestId;
use crate::render::{render_error_page, render_order_page};

use super::{upstream_message, AppState};

/// `GET /`: the human-facing order page.
pub(super) async fn order_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    match state.client.fetch_order().await {
        Ok(raw) => {
            let summary = normalize_order(&raw);
            Html(render_order_page(&summary, &Value::Object(raw))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, request_id = %req_id.0, "order page fetch failed");
            (
                StatusCode::BAD_GATEWAY,
                Html(render_error_page(&upstream_message(&e))),
            )
                .into_response()
        }
    }
}
