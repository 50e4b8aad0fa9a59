//! Collaborator contracts consumed by the metric collector.
//!
//! An `Ok` answer is a real result, including "nothing found" (`None`, an empty
//! scan). An `Err` means the source could not answer this time. The collector
//! memoizes only `Ok` answers and substitutes the neutral value for an `Err`
//! within the current run, so nothing raised by a data source can abort scoring.

use async_trait::async_trait;

use crate::providers::ProviderError;
use crate::workflows::site_selection::domain::{Coordinates, Demographics, VenueScan};

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ProviderError>;
}

/// Detailed demographics for places inside a recognized US state.
#[async_trait]
pub trait DemographicSource: Send + Sync {
    async fn demographics(&self, region: &str, locality: &str)
        -> Result<Demographics, ProviderError>;
}

/// Best-effort demographics for places outside the domestic table. Static, so it
/// cannot fail.
#[async_trait]
pub trait FallbackDemographicSource: Send + Sync {
    async fn demographics(&self, locality: &str) -> Demographics;
}

#[async_trait]
pub trait HistoricalPopulationSource: Send + Sync {
    async fn population(
        &self,
        year: u16,
        region: &str,
        locality: &str,
    ) -> Result<Option<u64>, ProviderError>;
}

#[async_trait]
pub trait CompetitorSource: Send + Sync {
    async fn competitors(
        &self,
        at: Coordinates,
        radius_meters: u32,
    ) -> Result<VenueScan, ProviderError>;
}

#[async_trait]
pub trait TransitSource: Send + Sync {
    async fn transit_count(&self, at: Coordinates, radius_meters: u32)
        -> Result<u32, ProviderError>;
}

#[async_trait]
pub trait CommercialPriceSource: Send + Sync {
    async fn average_sale_price(
        &self,
        at: Coordinates,
        radius_miles: f64,
    ) -> Result<Option<f64>, ProviderError>;
}
