use serde::{Deserialize, Serialize};

use super::regions;

/// A user-supplied place, e.g. `"Austin, TX"` or `"Toronto"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityQuery {
    raw: String,
    locality: String,
    region: Option<String>,
}

impl CityQuery {
    /// Splits the query at its last comma into a locality and a region qualifier.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (locality, region) = match trimmed.rsplit_once(',') {
            Some((locality, region)) if !region.trim().is_empty() => {
                (locality.trim(), Some(region.trim().to_string()))
            }
            Some((locality, _)) => (locality.trim(), None),
            None => (trimmed, None),
        };

        Self {
            raw: trimmed.to_string(),
            locality: locality.to_string(),
            region,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn locality(&self) -> &str {
        &self.locality
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Upper-cased US state code when the region qualifier is a recognized one.
    pub fn us_state_code(&self) -> Option<&'static str> {
        self.region.as_deref().and_then(regions::us_state_code)
    }

    pub fn demographic_path(&self) -> DemographicPath {
        if self.us_state_code().is_some() {
            DemographicPath::Domestic
        } else {
            DemographicPath::Fallback
        }
    }
}

impl From<&str> for CityQuery {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Which demographic branch produced a record's population figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemographicPath {
    Domestic,
    Fallback,
}

impl DemographicPath {
    pub fn label(self) -> &'static str {
        match self {
            DemographicPath::Domestic => "US census",
            DemographicPath::Fallback => "fallback table",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Bit-exact key so coordinates can participate in memoization.
    pub(crate) fn cache_key(self) -> (u64, u64) {
        (self.latitude.to_bits(), self.longitude.to_bits())
    }
}

/// Population and income pair returned by the demographic sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub population: Option<u64>,
    pub median_income: Option<u64>,
}

impl Demographics {
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// A competing venue found near a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: Option<String>,
    pub location: Coordinates,
}

/// Result of a competitor-density lookup. `count` is `None` when the source failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueScan {
    pub count: Option<u32>,
    pub venues: Vec<Venue>,
}

impl VenueScan {
    pub fn failed() -> Self {
        Self::default()
    }
}

/// Aggregated operational metrics for the portfolio rows matching a city.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub office_area: f64,
    pub total_area: f64,
    pub efficiency: f64,
    pub occupancy: f64,
    pub cbitda: f64,
    pub matched_rows: usize,
}

/// Everything collected for one resolved city. Construction requires coordinates,
/// so unresolved cities never reach the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMetricRecord {
    pub query: String,
    pub locality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub coordinates: Coordinates,
    pub demographic_path: DemographicPath,
    pub population: Option<u64>,
    pub median_income: Option<u64>,
    /// Projected growth over the forward horizon as a signed fraction.
    pub growth: f64,
    pub competitors: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitor_venues: Vec<Venue>,
    pub transit: u32,
    pub avg_commercial_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<PortfolioMetrics>,
}

impl RawMetricRecord {
    /// Record with every optional metric at its neutral default.
    pub fn new(query: &CityQuery, coordinates: Coordinates) -> Self {
        Self {
            query: query.raw().to_string(),
            locality: query.locality().to_string(),
            region: query.region().map(str::to_string),
            coordinates,
            demographic_path: query.demographic_path(),
            population: None,
            median_income: None,
            growth: 0.0,
            competitors: 0,
            competitor_venues: Vec::new(),
            transit: 0,
            avg_commercial_price: None,
            portfolio: None,
        }
    }

    pub(crate) fn portfolio_or_default(&self) -> PortfolioMetrics {
        self.portfolio.unwrap_or_default()
    }
}
