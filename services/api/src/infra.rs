use metrics_exporter_prometheus::PrometheusHandle;
use site_scout::config::AppConfig;
use site_scout::error::AppError;
use site_scout::providers;
use site_scout::workflows::property::PropertyLookupService;
use site_scout::workflows::site_selection::{
    MetricCollector, PortfolioDataset, SiteSelectionService,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Workflow services sharing one HTTP client and one set of lookup caches.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) site_selection: Arc<SiteSelectionService>,
    pub(crate) property: Arc<PropertyLookupService>,
}

pub(crate) fn build_services(config: &AppConfig) -> Result<Services, AppError> {
    let client = providers::http_client(&config.sources)?;
    let sources = providers::collaborators(&client, &config.sources, &config.collector);

    let mut collector = MetricCollector::new(sources, config.collector.clone());
    if let Some(path) = &config.collector.portfolio_csv {
        let dataset = PortfolioDataset::from_path(path)?;
        info!(path = %path.display(), rows = dataset.len(), "portfolio dataset loaded");
        collector = collector.with_portfolio(Arc::new(dataset));
    }

    let property = PropertyLookupService::new(
        Arc::new(providers::attom_client(&client, &config.sources)),
        Arc::new(providers::hunter_client(&client, &config.sources)),
        config.collector.commercial_radius_miles,
    );

    Ok(Services {
        site_selection: Arc::new(SiteSelectionService::new(Arc::new(collector))),
        property: Arc::new(property),
    })
}
