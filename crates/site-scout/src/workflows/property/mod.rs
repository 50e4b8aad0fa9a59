//! Single-address property lookup: record, nearby commercial parcels and owner contact.

pub mod domain;
pub mod router;
pub mod service;

use async_trait::async_trait;

use crate::providers::ProviderError;
use crate::workflows::site_selection::domain::Coordinates;
use domain::{NearbyProperty, PropertyQuery, PropertyRecord};

pub use domain::{OwnerContact, PropertyReport};
pub use router::property_router;
pub use service::{domain_from_owner, PropertyLookupError, PropertyLookupService};

/// Property records keyed by street address.
#[async_trait]
pub trait PropertyRecordSource: Send + Sync {
    async fn property(&self, query: &PropertyQuery)
        -> Result<Option<PropertyRecord>, ProviderError>;

    /// Best effort; failures come back as an empty list.
    async fn commercial_near(&self, at: Coordinates, radius_miles: f64) -> Vec<NearbyProperty>;
}

#[async_trait]
pub trait OwnerEmailSource: Send + Sync {
    async fn first_email(&self, domain: &str) -> Option<String>;
}
