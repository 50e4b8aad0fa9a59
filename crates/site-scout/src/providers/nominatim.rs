//! Nominatim / OpenStreetMap geocoder.
//!
//! The public instance allows one request per second. Requests from every clone
//! of a geocoder pass through one shared gate; repeated places are served from the
//! collector's memo cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::{ensure_success, ProviderError};
use crate::workflows::site_selection::collector::Geocoder;
use crate::workflows::site_selection::domain::Coordinates;

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    gate: Arc<RequestGate>,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            gate: Arc::new(RequestGate::new(Duration::ZERO)),
        }
    }

    /// Spaces requests at least `interval` apart. `Duration::ZERO` disables it.
    pub fn with_rate_limit(mut self, interval: Duration) -> Self {
        self.gate = Arc::new(RequestGate::new(interval));
        self
    }

    /// Free-form search returning the best match, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP request or response parsing fails.
    pub async fn search(&self, query: &str) -> Result<Option<Coordinates>, ProviderError> {
        self.gate.wait_turn().await;

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?;

        let body: serde_json::Value = ensure_success("Nominatim", resp).await?.json().await?;
        parse_response(&body)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ProviderError> {
        self.search(place).await
    }
}

/// Hands out request slots no closer than `interval`. Callers queue on the lock,
/// so concurrent workers are serialized rather than rejected.
#[derive(Debug)]
struct RequestGate {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestGate {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    async fn wait_turn(&self) {
        if self.interval.is_zero() {
            return;
        }

        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();
        let pending = *next_slot;
        if let Some(slot) = pending.filter(|slot| *slot > now) {
            debug!(wait_ms = slot.duration_since(now).as_millis(), "geocoder throttled");
            sleep_until(slot).await;
        }
        *next_slot = Some(Instant::now() + self.interval);
    }
}

fn parse_response(body: &serde_json::Value) -> Result<Option<Coordinates>, ProviderError> {
    let results = body
        .as_array()
        .ok_or_else(|| ProviderError::parse("Nominatim response is not an array"))?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let coordinate = |field: &str| {
        first[field]
            .as_str()
            .and_then(|value| value.parse::<f64>().ok())
            .ok_or_else(|| ProviderError::parse(format!("Missing {field} in Nominatim response")))
    };

    Ok(Some(Coordinates::new(coordinate("lat")?, coordinate("lon")?)))
}
