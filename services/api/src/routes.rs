use crate::infra::{AppState, Services};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use site_scout::workflows::property::property_router;
use site_scout::workflows::site_selection::scoring::MAX_SLIDER_WEIGHT;
use site_scout::workflows::site_selection::{site_selection_router, MetricKind, WeightVector};

#[derive(Debug, Serialize)]
pub(crate) struct MetricDescriptor {
    pub(crate) metric: MetricKind,
    pub(crate) default_weight: f64,
    /// Cost metrics subtract from the score.
    pub(crate) cost: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct MetricCatalog {
    pub(crate) max_weight: f64,
    pub(crate) metrics: Vec<MetricDescriptor>,
}

pub(crate) fn with_workflow_routes(services: &Services) -> axum::Router {
    site_selection_router(services.site_selection.clone())
        .merge(property_router(services.property.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/sites/metrics",
            axum::routing::get(metric_catalog_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Weightable metrics with their defaults, for building weight sliders.
pub(crate) async fn metric_catalog_endpoint() -> Json<MetricCatalog> {
    let defaults = WeightVector::default();
    Json(MetricCatalog {
        max_weight: MAX_SLIDER_WEIGHT,
        metrics: MetricKind::ALL
            .into_iter()
            .map(|metric| MetricDescriptor {
                metric,
                default_weight: defaults.get(metric),
                cost: metric.is_cost(),
            })
            .collect(),
    })
}
