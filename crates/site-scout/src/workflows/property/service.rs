use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{OwnerContact, PropertyQuery, PropertyReport};
use super::{OwnerEmailSource, PropertyRecordSource};
use crate::providers::ProviderError;

pub const UNKNOWN_OWNER: &str = "Unknown Owner";
pub const NEARBY_LIMIT: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum PropertyLookupError {
    #[error("no property record found for '{0}'")]
    NotFound(String),
    #[error("property address is empty")]
    EmptyAddress,
    #[error(transparent)]
    Source(#[from] ProviderError),
}

pub struct PropertyLookupService {
    records: Arc<dyn PropertyRecordSource>,
    emails: Arc<dyn OwnerEmailSource>,
    radius_miles: f64,
}

impl PropertyLookupService {
    pub fn new(
        records: Arc<dyn PropertyRecordSource>,
        emails: Arc<dyn OwnerEmailSource>,
        radius_miles: f64,
    ) -> Self {
        Self {
            records,
            emails,
            radius_miles,
        }
    }

    pub async fn lookup(
        &self,
        query: &PropertyQuery,
    ) -> Result<PropertyReport, PropertyLookupError> {
        if query.line1().is_empty() {
            return Err(PropertyLookupError::EmptyAddress);
        }

        let property = self
            .records
            .property(query)
            .await?
            .ok_or_else(|| PropertyLookupError::NotFound(query.line1().to_string()))?;

        let known_owner = property.owner_name.clone();
        let owner_name = known_owner
            .clone()
            .unwrap_or_else(|| UNKNOWN_OWNER.to_string());
        let domain = domain_from_owner(&owner_name);

        let (mut nearby, email) = tokio::join!(
            self.records.commercial_near(property.location, self.radius_miles),
            async {
                match known_owner {
                    Some(_) => self.emails.first_email(&domain).await,
                    None => None,
                }
            },
        );
        nearby.truncate(NEARBY_LIMIT);
        debug!(domain = %domain, found_email = email.is_some(), "owner contact resolved");

        info!(
            address = %property.address,
            owner = %owner_name,
            nearby = nearby.len(),
            "property lookup complete"
        );

        Ok(PropertyReport {
            property,
            nearby,
            owner: OwnerContact {
                owner_name,
                domain,
                email,
            },
        })
    }
}

/// Guesses a company domain: alphanumerics of the owner name, lowercased, plus `.com`.
pub fn domain_from_owner(owner_name: &str) -> String {
    let stem: String = owner_name
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    format!("{stem}.com")
}
