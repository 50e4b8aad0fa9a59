use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound offered by the interactive weight controls.
pub const MAX_SLIDER_WEIGHT: f64 = 5.0;

/// Metrics that carry a user-adjustable weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Population,
    Growth,
    Transit,
    Competition,
    OfficeArea,
    TotalArea,
    Efficiency,
    Occupancy,
    Cbitda,
    Price,
}

impl MetricKind {
    pub const ALL: [MetricKind; 10] = [
        MetricKind::Population,
        MetricKind::Growth,
        MetricKind::Transit,
        MetricKind::Competition,
        MetricKind::OfficeArea,
        MetricKind::TotalArea,
        MetricKind::Efficiency,
        MetricKind::Occupancy,
        MetricKind::Cbitda,
        MetricKind::Price,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Population => "population",
            MetricKind::Growth => "growth",
            MetricKind::Transit => "transit",
            MetricKind::Competition => "competition",
            MetricKind::OfficeArea => "office_area",
            MetricKind::TotalArea => "total_area",
            MetricKind::Efficiency => "efficiency",
            MetricKind::Occupancy => "occupancy",
            MetricKind::Cbitda => "cbitda",
            MetricKind::Price => "price",
        }
    }

    /// Cost factors subtract from the score.
    pub fn is_cost(self) -> bool {
        matches!(self, MetricKind::Competition | MetricKind::Price)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = WeightError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let kind = match normalized.as_str() {
            "population" | "pop" => MetricKind::Population,
            "growth" => MetricKind::Growth,
            "transit" => MetricKind::Transit,
            "competition" | "competitors" => MetricKind::Competition,
            "office_area" => MetricKind::OfficeArea,
            "total_area" => MetricKind::TotalArea,
            "efficiency" => MetricKind::Efficiency,
            "occupancy" => MetricKind::Occupancy,
            "cbitda" => MetricKind::Cbitda,
            "price" | "commercial_price" => MetricKind::Price,
            _ => return Err(WeightError::UnknownMetric(value.trim().to_string())),
        };
        Ok(kind)
    }
}

fn default_weight() -> f64 {
    1.0
}

/// Per-run multipliers, fixed for the whole batch. Omitted weights default to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightVector {
    #[serde(default = "default_weight")]
    pub population: f64,
    #[serde(default = "default_weight")]
    pub growth: f64,
    #[serde(default = "default_weight")]
    pub transit: f64,
    #[serde(default = "default_weight")]
    pub competition: f64,
    #[serde(default = "default_weight")]
    pub office_area: f64,
    #[serde(default = "default_weight")]
    pub total_area: f64,
    #[serde(default = "default_weight")]
    pub efficiency: f64,
    #[serde(default = "default_weight")]
    pub occupancy: f64,
    #[serde(default = "default_weight")]
    pub cbitda: f64,
    #[serde(default = "default_weight")]
    pub price: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::uniform(default_weight())
    }
}

impl WeightVector {
    pub fn uniform(weight: f64) -> Self {
        Self {
            population: weight,
            growth: weight,
            transit: weight,
            competition: weight,
            office_area: weight,
            total_area: weight,
            efficiency: weight,
            occupancy: weight,
            cbitda: weight,
            price: weight,
        }
    }

    pub fn get(&self, metric: MetricKind) -> f64 {
        match metric {
            MetricKind::Population => self.population,
            MetricKind::Growth => self.growth,
            MetricKind::Transit => self.transit,
            MetricKind::Competition => self.competition,
            MetricKind::OfficeArea => self.office_area,
            MetricKind::TotalArea => self.total_area,
            MetricKind::Efficiency => self.efficiency,
            MetricKind::Occupancy => self.occupancy,
            MetricKind::Cbitda => self.cbitda,
            MetricKind::Price => self.price,
        }
    }

    pub fn with(mut self, metric: MetricKind, weight: f64) -> Self {
        let slot = match metric {
            MetricKind::Population => &mut self.population,
            MetricKind::Growth => &mut self.growth,
            MetricKind::Transit => &mut self.transit,
            MetricKind::Competition => &mut self.competition,
            MetricKind::OfficeArea => &mut self.office_area,
            MetricKind::TotalArea => &mut self.total_area,
            MetricKind::Efficiency => &mut self.efficiency,
            MetricKind::Occupancy => &mut self.occupancy,
            MetricKind::Cbitda => &mut self.cbitda,
            MetricKind::Price => &mut self.price,
        };
        *slot = weight;
        self
    }

    /// Applies `metric=value` overrides in order, e.g. `competition=2.5`.
    pub fn with_overrides<I, S>(self, overrides: I) -> Result<Self, WeightError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        overrides.into_iter().try_fold(self, |weights, raw| {
            let raw = raw.as_ref();
            let (metric, value) = raw
                .split_once('=')
                .ok_or_else(|| WeightError::MalformedOverride(raw.to_string()))?;
            let metric: MetricKind = metric.parse()?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| WeightError::MalformedOverride(raw.to_string()))?;
            Ok(weights.with(metric, value))
        })
    }

    /// Weights must be finite and non-negative.
    pub fn validate(&self) -> Result<(), WeightError> {
        for metric in MetricKind::ALL {
            let value = self.get(metric);
            if !value.is_finite() {
                return Err(WeightError::NotFinite { metric });
            }
            if value < 0.0 {
                return Err(WeightError::Negative { metric, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("weight for {metric} must be non-negative (got {value})")]
    Negative { metric: MetricKind, value: f64 },
    #[error("weight for {metric} must be a finite number")]
    NotFinite { metric: MetricKind },
    #[error("unknown metric '{0}'")]
    UnknownMetric(String),
    #[error("weight override '{0}' must look like metric=value")]
    MalformedOverride(String),
}
