use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::PropertyQuery;
use super::service::{PropertyLookupError, PropertyLookupService};

pub fn property_router(service: Arc<PropertyLookupService>) -> Router {
    Router::new()
        .route("/api/v1/properties/lookup", post(lookup_handler))
        .with_state(service)
}

pub(crate) async fn lookup_handler(
    State(service): State<Arc<PropertyLookupService>>,
    axum::Json(query): axum::Json<PropertyQuery>,
) -> Response {
    match service.lookup(&query).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => {
            let status = match &error {
                PropertyLookupError::NotFound(_) => StatusCode::NOT_FOUND,
                PropertyLookupError::EmptyAddress => StatusCode::BAD_REQUEST,
                PropertyLookupError::Source(source) => {
                    warn!(%source, "property source failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
        }
    }
}
