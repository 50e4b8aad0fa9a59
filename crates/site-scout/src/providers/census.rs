//! US Census Bureau ACS 5-year estimates.
//!
//! See <https://www.census.gov/data/developers/data-sets/acs-5year.html>

use async_trait::async_trait;

use super::{ensure_success, ProviderError};
use crate::workflows::site_selection::collector::{DemographicSource, HistoricalPopulationSource};
use crate::workflows::site_selection::domain::Demographics;
use crate::workflows::site_selection::growth::REFERENCE_YEAR;
use crate::workflows::site_selection::regions;

const TOTAL_POPULATION: &str = "B01003_001E";
const MEDIAN_HOUSEHOLD_INCOME: &str = "B19013_001E";

/// Legal/statistical suffixes the Census appends to place names.
const PLACE_SUFFIXES: &[&str] = &[
    "city",
    "town",
    "village",
    "borough",
    "municipality",
    "cdp",
    "urban county",
    "metropolitan government",
    "consolidated government",
    "unified government",
];

#[derive(Debug, Clone)]
pub struct CensusClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CensusClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Population (and optionally median income) for a place in a state.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the state is unknown, or if the HTTP request or
    /// response parsing fails.
    pub async fn place(
        &self,
        year: u16,
        state: &str,
        locality: &str,
        include_income: bool,
    ) -> Result<Option<Demographics>, ProviderError> {
        let fips = regions::state_fips(state)
            .ok_or_else(|| ProviderError::parse(format!("unknown state code '{state}'")))?;

        let variables = if include_income {
            format!("NAME,{TOTAL_POPULATION},{MEDIAN_HOUSEHOLD_INCOME}")
        } else {
            format!("NAME,{TOTAL_POPULATION}")
        };
        let state_filter = format!("state:{fips}");

        let mut request = self
            .client
            .get(format!("{}/{year}/acs/acs5", self.base_url))
            .query(&[
                ("get", variables.as_str()),
                ("for", "place:*"),
                ("in", state_filter.as_str()),
            ]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let resp = ensure_success("Census", request.send().await?).await?;
        if resp.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body: serde_json::Value = resp.json().await?;
        parse_place_rows(&body, locality)
    }
}

#[async_trait]
impl DemographicSource for CensusClient {
    async fn demographics(
        &self,
        region: &str,
        locality: &str,
    ) -> Result<Demographics, ProviderError> {
        let found = self.place(REFERENCE_YEAR, region, locality, true).await?;
        Ok(found.unwrap_or_else(Demographics::unknown))
    }
}

#[async_trait]
impl HistoricalPopulationSource for CensusClient {
    async fn population(
        &self,
        year: u16,
        region: &str,
        locality: &str,
    ) -> Result<Option<u64>, ProviderError> {
        let found = self.place(year, region, locality, false).await?;
        Ok(found.and_then(|demographics| demographics.population))
    }
}

/// Finds the place row for `locality` in an ACS table (header row first).
fn parse_place_rows(
    body: &serde_json::Value,
    locality: &str,
) -> Result<Option<Demographics>, ProviderError> {
    let rows = body
        .as_array()
        .ok_or_else(|| ProviderError::parse("Census response is not an array"))?;
    let Some((header, data)) = rows.split_first() else {
        return Ok(None);
    };

    let column = |name: &str| {
        header
            .as_array()
            .and_then(|columns| columns.iter().position(|column| column == name))
    };
    let name_col = column("NAME").ok_or_else(|| ProviderError::parse("Census header lacks NAME"))?;
    let population_col = column(TOTAL_POPULATION)
        .ok_or_else(|| ProviderError::parse("Census header lacks population"))?;
    let income_col = column(MEDIAN_HOUSEHOLD_INCOME);

    let row = data.iter().find(|row| {
        row.get(name_col)
            .and_then(|name| name.as_str())
            .map(|name| place_name_matches(name, locality))
            .unwrap_or(false)
    });

    Ok(row.map(|row| Demographics {
        population: estimate(row.get(population_col)),
        median_income: income_col.and_then(|col| estimate(row.get(col))),
    }))
}

/// `"Austin city, Texas"` matches `"austin"`; `"Round Rock city, Texas"` does not.
fn place_name_matches(census_name: &str, locality: &str) -> bool {
    let place = census_name
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let locality = locality.trim().to_lowercase();
    if locality.is_empty() {
        return false;
    }
    if place == locality {
        return true;
    }

    place
        .strip_prefix(&locality)
        .and_then(|rest| rest.strip_prefix(' '))
        .map(|suffix| {
            PLACE_SUFFIXES
                .iter()
                .any(|known| suffix == *known || suffix.starts_with(&format!("{known} ")))
        })
        .unwrap_or(false)
}

// ACS encodes missing estimates as large negative sentinels.
fn estimate(cell: Option<&serde_json::Value>) -> Option<u64> {
    let cell = cell?;
    let value = match cell {
        serde_json::Value::String(raw) => raw.trim().parse::<i64>().ok()?,
        serde_json::Value::Number(number) => number.as_i64()?,
        _ => return None,
    };
    u64::try_from(value).ok()
}
