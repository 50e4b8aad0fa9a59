//! Overpass API (OpenStreetMap) points-of-interest lookups.
//!
//! See <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL>

use async_trait::async_trait;

use super::{ensure_success, ProviderError};
use crate::workflows::site_selection::collector::{CompetitorSource, TransitSource};
use crate::workflows::site_selection::domain::{Coordinates, Venue, VenueScan};

const QUERY_TIMEOUT_SECS: u32 = 25;

/// Tag filters counted as transit access points.
const TRANSIT_FILTERS: &[&str] = &[
    r#"["public_transport"="station"]"#,
    r#"["public_transport"="stop_position"]"#,
    r#"["highway"="bus_stop"]"#,
    r#"["railway"="subway_entrance"]"#,
];

#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: reqwest::Client,
    base_url: String,
    competitor_filter: String,
}

impl OverpassClient {
    /// `competitor_tag` is an OSM `key=value` pair (or a bare key).
    pub fn new(client: reqwest::Client, base_url: &str, competitor_tag: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            competitor_filter: tag_filter(competitor_tag),
        }
    }

    /// Venues carrying the competitor tag around a point.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP request or response parsing fails.
    pub async fn venues(
        &self,
        at: Coordinates,
        radius_meters: u32,
    ) -> Result<Vec<Venue>, ProviderError> {
        let query = competitor_query(&self.competitor_filter, at, radius_meters);
        let body = self.interpret(query).await?;
        parse_venues(&body)
    }

    /// Number of transit access points around a point.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP request or response parsing fails.
    pub async fn transit_stops(
        &self,
        at: Coordinates,
        radius_meters: u32,
    ) -> Result<u32, ProviderError> {
        let body = self.interpret(transit_query(at, radius_meters)).await?;
        parse_count(&body)
    }

    async fn interpret(&self, query: String) -> Result<serde_json::Value, ProviderError> {
        let resp = self
            .client
            .post(&self.base_url)
            .form(&[("data", query)])
            .send()
            .await?;

        Ok(ensure_success("Overpass", resp).await?.json().await?)
    }
}

#[async_trait]
impl CompetitorSource for OverpassClient {
    async fn competitors(
        &self,
        at: Coordinates,
        radius_meters: u32,
    ) -> Result<VenueScan, ProviderError> {
        let venues = self.venues(at, radius_meters).await?;
        Ok(VenueScan {
            count: u32::try_from(venues.len()).ok(),
            venues,
        })
    }
}

#[async_trait]
impl TransitSource for OverpassClient {
    async fn transit_count(
        &self,
        at: Coordinates,
        radius_meters: u32,
    ) -> Result<u32, ProviderError> {
        self.transit_stops(at, radius_meters).await
    }
}

fn tag_filter(tag: &str) -> String {
    match tag.split_once('=') {
        Some((key, value)) => format!(r#"["{}"="{}"]"#, key.trim(), value.trim()),
        None => format!(r#"["{}"]"#, tag.trim()),
    }
}

fn around(at: Coordinates, radius_meters: u32) -> String {
    format!("(around:{radius_meters},{},{})", at.latitude, at.longitude)
}

fn competitor_query(filter: &str, at: Coordinates, radius_meters: u32) -> String {
    let area = around(at, radius_meters);
    format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];(nwr{filter}{area};);out center;")
}

fn transit_query(at: Coordinates, radius_meters: u32) -> String {
    let area = around(at, radius_meters);
    let statements: String = TRANSIT_FILTERS
        .iter()
        .map(|filter| format!("node{filter}{area};"))
        .collect();
    format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];({statements});out count;")
}

fn elements(body: &serde_json::Value) -> Result<&Vec<serde_json::Value>, ProviderError> {
    body["elements"]
        .as_array()
        .ok_or_else(|| ProviderError::parse("Overpass response lacks elements"))
}

/// Nodes carry `lat`/`lon`; ways and relations carry a `center` with `out center`.
fn parse_venues(body: &serde_json::Value) -> Result<Vec<Venue>, ProviderError> {
    let venues = elements(body)?
        .iter()
        .filter_map(|element| {
            let point = if element.get("lat").is_some() {
                element
            } else {
                element.get("center")?
            };
            let latitude = point["lat"].as_f64()?;
            let longitude = point["lon"].as_f64()?;

            Some(Venue {
                name: element["tags"]["name"].as_str().map(str::to_string),
                location: Coordinates::new(latitude, longitude),
            })
        })
        .collect();

    Ok(venues)
}

fn parse_count(body: &serde_json::Value) -> Result<u32, ProviderError> {
    let counted = elements(body)?
        .iter()
        .find(|element| element["type"] == "count")
        .ok_or_else(|| ProviderError::parse("Overpass response lacks a count element"))?;

    let total = &counted["tags"]["total"];
    total
        .as_str()
        .and_then(|raw| raw.parse::<u32>().ok())
        .or_else(|| total.as_u64().and_then(|value| u32::try_from(value).ok()))
        .ok_or_else(|| ProviderError::parse("Overpass count element lacks a total"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_filters_support_key_value_and_bare_keys() {
        assert_eq!(tag_filter("office=coworking"), r#"["office"="coworking"]"#);
        assert_eq!(tag_filter(" shop "), r#"["shop"]"#);
    }

    #[test]
    fn queries_embed_radius_and_point() {
        let at = Coordinates::new(30.27, -97.74);
        let query = competitor_query(r#"["office"="coworking"]"#, at, 5000);
        assert!(query.contains(r#"nwr["office"="coworking"](around:5000,30.27,-97.74)"#));
        assert!(query.ends_with("out center;"));

        let transit = transit_query(at, 800);
        assert_eq!(transit.matches("(around:800,30.27,-97.74)").count(), 4);
        assert!(transit.ends_with("out count;"));
    }

    #[test]
    fn venues_use_node_position_or_way_center() {
        let body = serde_json::json!({
            "elements": [
                { "type": "node", "id": 1, "lat": 30.1, "lon": -97.1, "tags": { "name": "Hub" } },
                { "type": "way", "id": 2, "center": { "lat": 30.2, "lon": -97.2 }, "tags": {} },
                { "type": "relation", "id": 3, "tags": { "name": "No geometry" } }
            ]
        });
        let venues = parse_venues(&body).unwrap();
        assert_eq!(venues.len(), 2);
        assert_eq!(venues[0].name.as_deref(), Some("Hub"));
        assert_eq!(venues[1].name, None);
        assert_eq!(venues[1].location, Coordinates::new(30.2, -97.2));
    }

    #[test]
    fn count_reads_total_tag() {
        let body = serde_json::json!({
            "elements": [
                { "type": "count", "id": 0, "tags": { "nodes": "42", "total": "42" } }
            ]
        });
        assert_eq!(parse_count(&body).unwrap(), 42);
        assert!(parse_count(&serde_json::json!({ "elements": [] })).is_err());
    }
}
