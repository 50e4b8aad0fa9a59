//! HTTP clients for the third-party data sources.
//!
//! Inherent methods and the collector trait impls return [`ProviderError`]; the
//! metric collector logs a failed lookup and falls back to the neutral value for
//! that run only.

pub mod attom;
pub mod census;
pub mod hunter;
pub mod nominatim;
pub mod overpass;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{CollectorConfig, SourcesConfig};
use crate::workflows::site_selection::collector::{Collaborators, StaticFallbackDemographics};

pub use attom::AttomClient;
pub use census::CensusClient;
pub use hunter::HunterClient;
pub use nominatim::NominatimGeocoder;
pub use overpass::OverpassClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from data-source requests.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} responded with {status}: {body}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("{0} API key is not configured")]
    MissingApiKey(&'static str),

    #[error("Rate limit exceeded")]
    RateLimited,
}

impl ProviderError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// Rejects non-success responses, keeping the body for diagnostics.
pub(crate) async fn ensure_success(
    provider: &'static str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        provider,
        status,
        body,
    })
}

pub fn http_client(sources: &SourcesConfig) -> Result<reqwest::Client, ProviderError> {
    let client = reqwest::Client::builder()
        .user_agent(sources.user_agent.clone())
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Wires every collaborator to its HTTP implementation over one shared client.
pub fn collaborators(
    client: &reqwest::Client,
    sources: &SourcesConfig,
    collector: &CollectorConfig,
) -> Collaborators {
    let census = Arc::new(CensusClient::new(
        client.clone(),
        &sources.census_url,
        sources.census_api_key.clone(),
    ));
    let overpass = Arc::new(OverpassClient::new(
        client.clone(),
        &sources.overpass_url,
        &collector.competitor_tag,
    ));

    Collaborators {
        geocoder: Arc::new(
            NominatimGeocoder::new(client.clone(), &sources.nominatim_url)
                .with_rate_limit(sources.geocoder_rate_limit),
        ),
        demographics: census.clone(),
        fallback_demographics: Arc::new(StaticFallbackDemographics),
        historical_population: census,
        competitors: overpass.clone(),
        transit: overpass,
        commercial_prices: Arc::new(attom_client(client, sources)),
    }
}

pub fn attom_client(client: &reqwest::Client, sources: &SourcesConfig) -> AttomClient {
    AttomClient::new(
        client.clone(),
        &sources.attom_url,
        sources.attom_api_key.clone(),
    )
}

pub fn hunter_client(client: &reqwest::Client, sources: &SourcesConfig) -> HunterClient {
    HunterClient::new(
        client.clone(),
        &sources.hunter_url,
        sources.hunter_api_key.clone(),
    )
}
