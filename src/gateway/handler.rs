use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::encoder::{ClassificationRequest, CostRequest};
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::gateway::{CLINICAST_STATUS_HEADER, STATUS_OK, STATUS_PARTIAL};
use crate::response::{DomainSection, shape_classification, shape_cost};

/// `POST /api/cost/predict`: one itemized cost estimate per request.
///
/// A bucket whose artifact failed is zero-filled and reported in
/// `bucket_errors`; the response status header flips to `partial`.
#[instrument(skip(state, request))]
pub async fn cost_predict_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: CostRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid request schema: {e}")))?;

    let scores = state.cost.predict(&request);
    let failed = scores.failed_buckets();
    let body = shape_cost(&scores);

    debug!(failed_buckets = failed.len(), "cost prediction served");

    let status = if failed.is_empty() {
        STATUS_OK
    } else {
        STATUS_PARTIAL
    };

    Ok(tagged_response(status, Json(body)))
}

/// `POST /api/classification/predict`: ranked categories and procedures for
/// the three clinical domains.
#[instrument(skip(state, request))]
pub async fn classification_predict_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: ClassificationRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid request schema: {e}")))?;

    if request.length_of_stay < 0.0 {
        return Err(GatewayError::InvalidRequest(
            "lengthOfStay must be non-negative".to_string(),
        ));
    }

    let scores = state.classification.predict(&request);
    let body = shape_classification(scores);

    let all_ok = [&body.drug, &body.radiology, &body.laboratory]
        .iter()
        .all(|section| matches!(section, DomainSection::Ok { .. }));

    debug!(all_domains_ok = all_ok, "classification prediction served");

    let status = if all_ok { STATUS_OK } else { STATUS_PARTIAL };

    Ok(tagged_response(status, Json(body)))
}

fn tagged_response(status: &'static str, body: impl IntoResponse) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(CLINICAST_STATUS_HEADER, HeaderValue::from_static(status));
    (StatusCode::OK, headers, body).into_response()
}
