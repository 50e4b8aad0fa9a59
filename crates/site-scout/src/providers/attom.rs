//! ATTOM property data: property records, nearby commercial parcels and sales.
//!
//! See <https://api.developer.attomdata.com/docs>

use async_trait::async_trait;
use tracing::warn;

use super::{ensure_success, ProviderError};
use crate::workflows::property::domain::{NearbyProperty, PropertyQuery, PropertyRecord};
use crate::workflows::property::PropertyRecordSource;
use crate::workflows::site_selection::collector::CommercialPriceSource;
use crate::workflows::site_selection::domain::Coordinates;

const COMMERCIAL_PROPERTY_TYPE: &str = "COM";

#[derive(Debug, Clone)]
pub struct AttomClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AttomClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Looks up a single property by street address.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if no API key is configured, or if the HTTP request
    /// or response parsing fails.
    pub async fn property_by_address(
        &self,
        query: &PropertyQuery,
    ) -> Result<Option<PropertyRecord>, ProviderError> {
        let line2 = query.line2();
        let body = self
            .get(
                "property/address",
                &[("address1", query.line1()), ("address2", line2.as_str())],
            )
            .await?;

        Ok(properties(&body).first().and_then(parse_property))
    }

    /// Commercial parcels around a point, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if no API key is configured, or if the HTTP request
    /// or response parsing fails.
    pub async fn nearby_commercial(
        &self,
        at: Coordinates,
        radius_miles: f64,
    ) -> Result<Vec<NearbyProperty>, ProviderError> {
        let body = self.get("property/snapshot", &point_params(at, radius_miles)).await?;
        Ok(properties(&body).iter().filter_map(parse_nearby).collect())
    }

    /// Average of the positive sale amounts recorded for nearby commercial parcels.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if no API key is configured, or if the HTTP request
    /// or response parsing fails.
    pub async fn commercial_sale_average(
        &self,
        at: Coordinates,
        radius_miles: f64,
    ) -> Result<Option<f64>, ProviderError> {
        let body = self.get("sale/snapshot", &point_params(at, radius_miles)).await?;
        Ok(average_sale_amount(&body))
    }

    async fn get<Q: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        params: &Q,
    ) -> Result<serde_json::Value, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("ATTOM"))?;

        let resp = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .header("apikey", api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await?;

        Ok(ensure_success("ATTOM", resp).await?.json().await?)
    }
}

#[async_trait]
impl CommercialPriceSource for AttomClient {
    async fn average_sale_price(
        &self,
        at: Coordinates,
        radius_miles: f64,
    ) -> Result<Option<f64>, ProviderError> {
        self.commercial_sale_average(at, radius_miles).await
    }
}

#[async_trait]
impl PropertyRecordSource for AttomClient {
    async fn property(
        &self,
        query: &PropertyQuery,
    ) -> Result<Option<PropertyRecord>, ProviderError> {
        self.property_by_address(query).await
    }

    async fn commercial_near(&self, at: Coordinates, radius_miles: f64) -> Vec<NearbyProperty> {
        match self.nearby_commercial(at, radius_miles).await {
            Ok(nearby) => nearby,
            Err(error) => {
                warn!(%error, "nearby commercial lookup failed");
                Vec::new()
            }
        }
    }
}

fn point_params(at: Coordinates, radius_miles: f64) -> [(&'static str, String); 4] {
    [
        ("latitude", at.latitude.to_string()),
        ("longitude", at.longitude.to_string()),
        ("radius", radius_miles.to_string()),
        ("propertytype", COMMERCIAL_PROPERTY_TYPE.to_string()),
    ]
}

fn properties(body: &serde_json::Value) -> &[serde_json::Value] {
    body["property"].as_array().map(Vec::as_slice).unwrap_or_default()
}

/// ATTOM sends coordinates as strings in most payloads and as numbers in some.
fn number(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|raw| raw.trim().parse().ok()))
}

fn location(property: &serde_json::Value) -> Option<Coordinates> {
    let latitude = number(&property["location"]["latitude"])?;
    let longitude = number(&property["location"]["longitude"])?;
    Some(Coordinates::new(latitude, longitude))
}

fn owner_name(property: &serde_json::Value) -> Option<String> {
    let owner = &property["owner"]["owner1"];
    if let Some(name) = owner.as_str() {
        return Some(name.trim().to_string()).filter(|name| !name.is_empty());
    }

    if let Some(full) = owner["fullName"].as_str() {
        return Some(full.trim().to_string()).filter(|name| !name.is_empty());
    }

    let parts: Vec<&str> = [&owner["firstNameAndMi"], &owner["lastName"]]
        .into_iter()
        .filter_map(|part| part.as_str())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn parse_property(property: &serde_json::Value) -> Option<PropertyRecord> {
    Some(PropertyRecord {
        attom_id: property["identifier"]["attomId"].as_u64(),
        address: property["address"]["oneLine"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        location: location(property)?,
        owner_name: owner_name(property),
        property_type: property["summary"]["proptype"].as_str().map(str::to_string),
        details: property.clone(),
    })
}

fn parse_nearby(property: &serde_json::Value) -> Option<NearbyProperty> {
    Some(NearbyProperty {
        address: property["address"]["line1"].as_str()?.to_string(),
        location: location(property)?,
    })
}

fn average_sale_amount(body: &serde_json::Value) -> Option<f64> {
    let amounts: Vec<f64> = properties(body)
        .iter()
        .filter_map(|property| number(&property["sale"]["amount"]["saleamt"]))
        .filter(|amount| amount.is_finite() && *amount > 0.0)
        .collect();

    if amounts.is_empty() {
        return None;
    }
    Some(amounts.iter().sum::<f64>() / amounts.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_property_with_nested_owner() {
        let body = serde_json::json!({
            "property": [{
                "identifier": { "attomId": 145423726 },
                "address": { "line1": "1600 AMPHITHEATRE PKWY", "oneLine": "1600 AMPHITHEATRE PKWY, MOUNTAIN VIEW, CA 94043" },
                "location": { "latitude": "37.422288", "longitude": "-122.085652" },
                "summary": { "proptype": "COMMERCIAL" },
                "owner": { "owner1": { "fullName": "GOOGLE LLC" } }
            }]
        });

        let record = properties(&body).first().and_then(parse_property).unwrap();
        assert_eq!(record.attom_id, Some(145_423_726));
        assert_eq!(record.owner_name.as_deref(), Some("GOOGLE LLC"));
        assert!((record.location.latitude - 37.422288).abs() < 1e-9);
        assert_eq!(record.property_type.as_deref(), Some("COMMERCIAL"));
    }

    #[test]
    fn owner_names_accept_plain_strings_and_name_parts() {
        let plain = serde_json::json!({ "owner": { "owner1": "ACME HOLDINGS" } });
        assert_eq!(owner_name(&plain).as_deref(), Some("ACME HOLDINGS"));

        let parts = serde_json::json!({ "owner": { "owner1": { "firstNameAndMi": "JANE Q", "lastName": "DOE" } } });
        assert_eq!(owner_name(&parts).as_deref(), Some("JANE Q DOE"));

        assert_eq!(owner_name(&serde_json::json!({})), None);
    }

    #[test]
    fn nearby_skips_entries_without_location() {
        let body = serde_json::json!({
            "property": [
                { "address": { "line1": "1 MAIN ST" }, "location": { "latitude": "30.1", "longitude": "-97.1" } },
                { "address": { "line1": "2 MAIN ST" } },
                { "location": { "latitude": 30.3, "longitude": -97.3 } }
            ]
        });
        let nearby: Vec<_> = properties(&body).iter().filter_map(parse_nearby).collect();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].address, "1 MAIN ST");
    }

    #[test]
    fn sale_average_ignores_missing_and_zero_amounts() {
        let body = serde_json::json!({
            "property": [
                { "sale": { "amount": { "saleamt": 500000 } } },
                { "sale": { "amount": { "saleamt": 0 } } },
                { "sale": { "amount": { "saleamt": "1500000" } } },
                { "sale": {} }
            ]
        });
        assert_eq!(average_sale_amount(&body), Some(1_000_000.0));
        assert_eq!(average_sale_amount(&serde_json::json!({ "property": [] })), None);
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let client = AttomClient::new(reqwest::Client::new(), "http://127.0.0.1:9", None);
        let error = client
            .commercial_sale_average(Coordinates::new(0.0, 0.0), 1.0)
            .await
            .expect_err("no key configured");
        assert!(matches!(error, ProviderError::MissingApiKey("ATTOM")));
    }
}
