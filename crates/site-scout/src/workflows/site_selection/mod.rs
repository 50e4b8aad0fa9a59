//! City site selection: metric collection, batch normalization and weighted ranking.

pub mod collector;
pub mod domain;
pub mod growth;
pub mod portfolio;
pub mod regions;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use collector::{CollectionOutcome, Collaborators, MetricCollector};
pub use domain::{
    CityQuery, Coordinates, DemographicPath, Demographics, PortfolioMetrics, RawMetricRecord,
    Venue, VenueScan,
};
pub use portfolio::{PortfolioDataset, PortfolioImportError};
pub use router::{site_selection_router, ScoreRequest};
pub use scoring::{
    MetricKind, NormalizedMetrics, ScoreComponent, ScoredRecord, ScoringEngine, WeightError,
    WeightVector,
};
pub use service::{ScoreReport, SiteSelectionError, SiteSelectionService};
