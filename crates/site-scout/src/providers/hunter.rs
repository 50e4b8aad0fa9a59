//! Hunter.io domain search for guessing an owner's contact address.

use async_trait::async_trait;
use tracing::warn;

use super::{ensure_success, ProviderError};
use crate::workflows::property::OwnerEmailSource;

#[derive(Debug, Clone)]
pub struct HunterClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HunterClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// First address Hunter knows for `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if no API key is configured, or if the HTTP request
    /// or response parsing fails.
    pub async fn domain_search(&self, domain: &str) -> Result<Option<String>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("Hunter"))?;

        let resp = self
            .client
            .get(format!("{}/domain-search", self.base_url))
            .query(&[("domain", domain), ("api_key", api_key)])
            .send()
            .await?;

        let body: serde_json::Value = ensure_success("Hunter", resp).await?.json().await?;
        Ok(first_email(&body))
    }
}

#[async_trait]
impl OwnerEmailSource for HunterClient {
    async fn first_email(&self, domain: &str) -> Option<String> {
        match self.domain_search(domain).await {
            Ok(email) => email,
            Err(error) => {
                warn!(domain, %error, "owner e-mail lookup failed");
                None
            }
        }
    }
}

fn first_email(body: &serde_json::Value) -> Option<String> {
    body["data"]["emails"]
        .as_array()?
        .iter()
        .find_map(|email| email["value"].as_str())
        .map(str::to_string)
}
