use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::scoring::WeightVector;
use super::service::{SiteSelectionError, SiteSelectionService};

/// Body of a scoring request. Omitted weights default to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub cities: Vec<String>,
    #[serde(default)]
    pub weights: WeightVector,
}

/// Router builder exposing the site scoring endpoint.
pub fn site_selection_router(service: Arc<SiteSelectionService>) -> Router {
    Router::new()
        .route("/api/v1/sites/score", post(score_handler))
        .with_state(service)
}

pub(crate) async fn score_handler(
    State(service): State<Arc<SiteSelectionService>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response {
    match service.score(&request.cities, request.weights).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(SiteSelectionError::Weights(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}
