//! Resolves city queries into raw metric records.

mod cache;
mod fallback;
pub mod sources;

pub use cache::MemoCache;
pub use fallback::StaticFallbackDemographics;
pub use sources::{
    CommercialPriceSource, CompetitorSource, DemographicSource, FallbackDemographicSource,
    Geocoder, HistoricalPopulationSource, TransitSource,
};

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{CityQuery, Coordinates, Demographics, RawMetricRecord, VenueScan};
use super::growth::{self, BASE_YEAR, REFERENCE_YEAR};
use super::portfolio::PortfolioDataset;
use crate::config::CollectorConfig;

/// The external data sources one collector draws from.
#[derive(Clone)]
pub struct Collaborators {
    pub geocoder: Arc<dyn Geocoder>,
    pub demographics: Arc<dyn DemographicSource>,
    pub fallback_demographics: Arc<dyn FallbackDemographicSource>,
    pub historical_population: Arc<dyn HistoricalPopulationSource>,
    pub competitors: Arc<dyn CompetitorSource>,
    pub transit: Arc<dyn TransitSource>,
    pub commercial_prices: Arc<dyn CommercialPriceSource>,
}

type PointKey = ((u64, u64), u64);

struct LookupCaches {
    geocode: MemoCache<String, Option<Coordinates>>,
    demographics: MemoCache<(String, String), Demographics>,
    fallback: MemoCache<String, Demographics>,
    history: MemoCache<(u16, String, String), Option<u64>>,
    competitors: MemoCache<PointKey, VenueScan>,
    transit: MemoCache<PointKey, u32>,
    prices: MemoCache<PointKey, Option<f64>>,
}

impl LookupCaches {
    fn new(settings: &CollectorConfig) -> Self {
        let ttl = settings.cache_ttl;
        let capacity = settings.cache_capacity;
        Self {
            geocode: MemoCache::new("geocode", ttl).with_capacity(capacity),
            demographics: MemoCache::new("demographics", ttl).with_capacity(capacity),
            fallback: MemoCache::new("fallback_demographics", ttl).with_capacity(capacity),
            history: MemoCache::new("historical_population", ttl).with_capacity(capacity),
            competitors: MemoCache::new("competitors", ttl).with_capacity(capacity),
            transit: MemoCache::new("transit", ttl).with_capacity(capacity),
            prices: MemoCache::new("commercial_prices", ttl).with_capacity(capacity),
        }
    }
}

/// Records gathered for a batch plus the queries that could not be located.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionOutcome {
    pub records: Vec<RawMetricRecord>,
    pub unresolved: Vec<String>,
}

pub struct MetricCollector {
    sources: Collaborators,
    settings: CollectorConfig,
    portfolio: Option<Arc<PortfolioDataset>>,
    caches: LookupCaches,
}

impl MetricCollector {
    pub fn new(sources: Collaborators, settings: CollectorConfig) -> Self {
        let caches = LookupCaches::new(&settings);
        Self {
            sources,
            settings,
            portfolio: None,
            caches,
        }
    }

    pub fn with_portfolio(mut self, dataset: Arc<PortfolioDataset>) -> Self {
        self.portfolio = Some(dataset);
        self
    }

    pub fn settings(&self) -> &CollectorConfig {
        &self.settings
    }

    /// Collects every query through a bounded worker pool. Records keep input order.
    pub async fn collect_batch(&self, queries: &[CityQuery]) -> CollectionOutcome {
        let workers = self.settings.concurrency.max(1);
        let results: Vec<(CityQuery, Option<RawMetricRecord>)> = stream::iter(queries.to_vec())
            .map(|query| async move {
                let record = self.collect(&query).await;
                (query, record)
            })
            .buffered(workers)
            .collect()
            .await;

        let mut outcome = CollectionOutcome::default();
        for (query, record) in results {
            match record {
                Some(record) => outcome.records.push(record),
                None => outcome.unresolved.push(query.raw().to_string()),
            }
        }

        info!(
            resolved = outcome.records.len(),
            unresolved = outcome.unresolved.len(),
            "metric collection finished"
        );
        outcome
    }

    /// Resolves one city, or `None` when it cannot be geocoded in this run.
    pub async fn collect(&self, query: &CityQuery) -> Option<RawMetricRecord> {
        let Some(coordinates) = self.geocode(query.raw()).await else {
            warn!(city = query.raw(), "could not resolve coordinates; city excluded");
            return None;
        };

        let radius = self.settings.search_radius_meters;
        let ((demographics, growth), competitors, transit, price) = tokio::join!(
            self.demographics(query),
            self.competitors(coordinates, radius),
            self.transit(coordinates, radius),
            self.commercial_price(coordinates),
        );

        let mut record = RawMetricRecord::new(query, coordinates);
        record.population = demographics.population;
        record.median_income = demographics.median_income;
        record.growth = growth;
        record.competitors = competitors.count.unwrap_or(0);
        record.competitor_venues = competitors.venues;
        record.transit = transit;
        record.avg_commercial_price = price.filter(|value| value.is_finite() && *value > 0.0);
        record.portfolio = self
            .portfolio
            .as_ref()
            .map(|dataset| dataset.metrics_for(query));

        debug!(
            city = query.raw(),
            path = record.demographic_path.label(),
            population = ?record.population,
            competitors = record.competitors,
            transit = record.transit,
            "collected city metrics"
        );
        Some(record)
    }

    async fn geocode(&self, place: &str) -> Option<Coordinates> {
        let geocoder = &self.sources.geocoder;
        self.caches
            .geocode
            .get_or_try_fetch(place.to_string(), || geocoder.geocode(place))
            .await
            .unwrap_or_else(|error| {
                warn!(place, %error, "geocoding failed");
                None
            })
    }

    async fn demographics(&self, query: &CityQuery) -> (Demographics, f64) {
        let locality = query.locality();
        match query.us_state_code() {
            Some(state) => {
                let (current, earlier, later) = tokio::join!(
                    self.domestic_demographics(state, locality),
                    self.historical_population(BASE_YEAR, state, locality),
                    self.historical_population(REFERENCE_YEAR, state, locality),
                );
                (current, growth::projected_growth(earlier, later))
            }
            None => {
                let fallback = &self.sources.fallback_demographics;
                let demographics = self
                    .caches
                    .fallback
                    .get_or_fetch(locality.to_string(), || fallback.demographics(locality))
                    .await;
                (demographics, growth::fallback_growth())
            }
        }
    }

    async fn domestic_demographics(&self, state: &str, locality: &str) -> Demographics {
        let source = &self.sources.demographics;
        self.caches
            .demographics
            .get_or_try_fetch((state.to_string(), locality.to_string()), || {
                source.demographics(state, locality)
            })
            .await
            .unwrap_or_else(|error| {
                warn!(state, locality, %error, "demographics lookup failed");
                Demographics::unknown()
            })
    }

    async fn historical_population(&self, year: u16, state: &str, locality: &str) -> Option<u64> {
        let source = &self.sources.historical_population;
        self.caches
            .history
            .get_or_try_fetch((year, state.to_string(), locality.to_string()), || {
                source.population(year, state, locality)
            })
            .await
            .unwrap_or_else(|error| {
                warn!(year, state, locality, %error, "population lookup failed");
                None
            })
    }

    async fn competitors(&self, at: Coordinates, radius_meters: u32) -> VenueScan {
        let source = &self.sources.competitors;
        self.caches
            .competitors
            .get_or_try_fetch((at.cache_key(), u64::from(radius_meters)), || {
                source.competitors(at, radius_meters)
            })
            .await
            .unwrap_or_else(|error| {
                warn!(%error, "competitor lookup failed");
                VenueScan::failed()
            })
    }

    async fn transit(&self, at: Coordinates, radius_meters: u32) -> u32 {
        let source = &self.sources.transit;
        self.caches
            .transit
            .get_or_try_fetch((at.cache_key(), u64::from(radius_meters)), || {
                source.transit_count(at, radius_meters)
            })
            .await
            .unwrap_or_else(|error| {
                warn!(%error, "transit lookup failed");
                0
            })
    }

    async fn commercial_price(&self, at: Coordinates) -> Option<f64> {
        let source = &self.sources.commercial_prices;
        let radius_miles = self.settings.commercial_radius_miles;
        self.caches
            .prices
            .get_or_try_fetch((at.cache_key(), radius_miles.to_bits()), || {
                source.average_sale_price(at, radius_miles)
            })
            .await
            .unwrap_or_else(|error| {
                warn!(%error, "commercial sales lookup failed");
                None
            })
    }
}
