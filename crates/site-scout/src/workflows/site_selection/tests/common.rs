use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::CollectorConfig;
use crate::providers::ProviderError;
use crate::workflows::site_selection::collector::{
    Collaborators, CommercialPriceSource, CompetitorSource, DemographicSource,
    FallbackDemographicSource, Geocoder, HistoricalPopulationSource, MetricCollector,
    TransitSource,
};
use crate::workflows::site_selection::domain::{
    CityQuery, Coordinates, Demographics, RawMetricRecord, Venue, VenueScan,
};
use crate::workflows::site_selection::growth::{BASE_YEAR, REFERENCE_YEAR};

/// Canned answers for one city. Point lookups are matched on the city's coordinates.
#[derive(Debug, Clone)]
pub(super) struct StubCity {
    pub(super) query: &'static str,
    pub(super) at: Coordinates,
    pub(super) demographics: Demographics,
    pub(super) population_2012: Option<u64>,
    pub(super) population_2022: Option<u64>,
    /// `None` simulates a failed competitor request.
    pub(super) competitors: Option<u32>,
    /// `None` simulates a failed transit request.
    pub(super) transit: Option<u32>,
    pub(super) price: Option<f64>,
}

pub(super) fn city(query: &'static str, latitude: f64, population: u64) -> StubCity {
    StubCity {
        query,
        at: Coordinates::new(latitude, -90.0),
        demographics: Demographics {
            population: Some(population),
            median_income: Some(60_000),
        },
        population_2012: None,
        population_2022: None,
        competitors: Some(0),
        transit: Some(0),
        price: None,
    }
}

/// In-memory stand-in for every collaborator, counting calls and injecting
/// outages on request.
#[derive(Debug, Default)]
pub(super) struct StubWorld {
    cities: Vec<StubCity>,
    geocode_calls: AtomicUsize,
    transit_calls: AtomicUsize,
    geocode_outages: AtomicUsize,
    transit_outages: AtomicUsize,
}

impl StubWorld {
    pub(super) fn new(cities: Vec<StubCity>) -> Arc<Self> {
        Arc::new(Self {
            cities,
            ..Self::default()
        })
    }

    pub(super) fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub(super) fn transit_calls(&self) -> usize {
        self.transit_calls.load(Ordering::SeqCst)
    }

    /// The next `count` geocode requests fail as if rate limited.
    pub(super) fn fail_next_geocodes(&self, count: usize) {
        self.geocode_outages.store(count, Ordering::SeqCst);
    }

    /// The next `count` transit requests fail as if rate limited.
    pub(super) fn fail_next_transit(&self, count: usize) {
        self.transit_outages.store(count, Ordering::SeqCst);
    }

    fn by_locality(&self, locality: &str) -> Option<&StubCity> {
        self.cities
            .iter()
            .find(|city| CityQuery::parse(city.query).locality() == locality)
    }

    fn by_point(&self, at: Coordinates) -> Option<&StubCity> {
        self.cities.iter().find(|city| city.at == at)
    }
}

fn take_outage(outages: &AtomicUsize) -> Result<(), ProviderError> {
    match outages.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1)) {
        Ok(_) => Err(ProviderError::RateLimited),
        Err(_) => Ok(()),
    }
}

#[async_trait]
impl Geocoder for StubWorld {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ProviderError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        take_outage(&self.geocode_outages)?;
        Ok(self
            .cities
            .iter()
            .find(|city| city.query == place)
            .map(|city| city.at))
    }
}

#[async_trait]
impl DemographicSource for StubWorld {
    async fn demographics(
        &self,
        _region: &str,
        locality: &str,
    ) -> Result<Demographics, ProviderError> {
        Ok(self
            .by_locality(locality)
            .map(|city| city.demographics)
            .unwrap_or_else(Demographics::unknown))
    }
}

#[async_trait]
impl FallbackDemographicSource for StubWorld {
    async fn demographics(&self, locality: &str) -> Demographics {
        self.by_locality(locality)
            .map(|city| city.demographics)
            .unwrap_or_else(Demographics::unknown)
    }
}

#[async_trait]
impl HistoricalPopulationSource for StubWorld {
    async fn population(
        &self,
        year: u16,
        _region: &str,
        locality: &str,
    ) -> Result<Option<u64>, ProviderError> {
        let Some(city) = self.by_locality(locality) else {
            return Ok(None);
        };
        Ok(match year {
            BASE_YEAR => city.population_2012,
            REFERENCE_YEAR => city.population_2022,
            _ => None,
        })
    }
}

#[async_trait]
impl CompetitorSource for StubWorld {
    async fn competitors(
        &self,
        at: Coordinates,
        _radius_meters: u32,
    ) -> Result<VenueScan, ProviderError> {
        let count = self
            .by_point(at)
            .and_then(|city| city.competitors)
            .ok_or(ProviderError::RateLimited)?;
        Ok(VenueScan {
            count: Some(count),
            venues: (0..count)
                .map(|index| Venue {
                    name: Some(format!("Desk Club {index}")),
                    location: at,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl TransitSource for StubWorld {
    async fn transit_count(
        &self,
        at: Coordinates,
        _radius_meters: u32,
    ) -> Result<u32, ProviderError> {
        self.transit_calls.fetch_add(1, Ordering::SeqCst);
        take_outage(&self.transit_outages)?;
        self.by_point(at)
            .and_then(|city| city.transit)
            .ok_or(ProviderError::RateLimited)
    }
}

#[async_trait]
impl CommercialPriceSource for StubWorld {
    async fn average_sale_price(
        &self,
        at: Coordinates,
        _radius_miles: f64,
    ) -> Result<Option<f64>, ProviderError> {
        Ok(self.by_point(at).and_then(|city| city.price))
    }
}

pub(super) fn collaborators(world: &Arc<StubWorld>) -> Collaborators {
    Collaborators {
        geocoder: world.clone(),
        demographics: world.clone(),
        fallback_demographics: world.clone(),
        historical_population: world.clone(),
        competitors: world.clone(),
        transit: world.clone(),
        commercial_prices: world.clone(),
    }
}

pub(super) fn settings() -> CollectorConfig {
    CollectorConfig {
        concurrency: 3,
        cache_ttl: None,
        ..CollectorConfig::default()
    }
}

pub(super) fn collector(world: &Arc<StubWorld>) -> MetricCollector {
    MetricCollector::new(collaborators(world), settings())
}

/// Record built directly, bypassing collection.
pub(super) fn record(
    name: &str,
    population: Option<u64>,
    competitors: u32,
    transit: u32,
) -> RawMetricRecord {
    let mut record = RawMetricRecord::new(&CityQuery::parse(name), Coordinates::new(0.0, 0.0));
    record.population = population;
    record.competitors = competitors;
    record.transit = transit;
    record
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

