use serde::{Deserialize, Serialize};

use super::super::domain::RawMetricRecord;

/// Per-batch maxima. Each bound is floored at 1 so all-zero metrics normalize to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationBounds {
    pub population: f64,
    pub median_income: f64,
    pub growth: f64,
    pub competition: f64,
    pub transit: f64,
    pub office_area: f64,
    pub total_area: f64,
    pub efficiency: f64,
    pub occupancy: f64,
    pub cbitda: f64,
}

impl NormalizationBounds {
    pub fn from_records(records: &[RawMetricRecord]) -> Self {
        Self {
            population: batch_max(records, population),
            median_income: batch_max(records, median_income),
            growth: batch_max(records, |record| record.growth),
            competition: batch_max(records, |record| f64::from(record.competitors)),
            transit: batch_max(records, |record| f64::from(record.transit)),
            office_area: batch_max(records, |record| record.portfolio_or_default().office_area),
            total_area: batch_max(records, |record| record.portfolio_or_default().total_area),
            efficiency: batch_max(records, |record| record.portfolio_or_default().efficiency),
            occupancy: batch_max(records, |record| record.portfolio_or_default().occupancy),
            cbitda: batch_max(records, |record| record.portfolio_or_default().cbitda),
        }
    }

    pub fn normalize(&self, record: &RawMetricRecord) -> NormalizedMetrics {
        let portfolio = record.portfolio_or_default();
        NormalizedMetrics {
            population: scale(population(record), self.population),
            median_income: scale(median_income(record), self.median_income),
            growth: scale(record.growth, self.growth),
            competition: scale(f64::from(record.competitors), self.competition),
            transit: scale(f64::from(record.transit), self.transit),
            office_area: scale(portfolio.office_area, self.office_area),
            total_area: scale(portfolio.total_area, self.total_area),
            efficiency: scale(portfolio.efficiency, self.efficiency),
            occupancy: scale(portfolio.occupancy, self.occupancy),
            cbitda: scale(portfolio.cbitda, self.cbitda),
        }
    }
}

/// Batch-relative values in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    pub population: f64,
    pub median_income: f64,
    pub growth: f64,
    pub competition: f64,
    pub transit: f64,
    pub office_area: f64,
    pub total_area: f64,
    pub efficiency: f64,
    pub occupancy: f64,
    pub cbitda: f64,
}

impl NormalizedMetrics {
    pub fn values(&self) -> [f64; 10] {
        [
            self.population,
            self.median_income,
            self.growth,
            self.competition,
            self.transit,
            self.office_area,
            self.total_area,
            self.efficiency,
            self.occupancy,
            self.cbitda,
        ]
    }
}

fn population(record: &RawMetricRecord) -> f64 {
    record.population.unwrap_or(0) as f64
}

fn median_income(record: &RawMetricRecord) -> f64 {
    record.median_income.unwrap_or(0) as f64
}

fn batch_max<F>(records: &[RawMetricRecord], metric: F) -> f64
where
    F: Fn(&RawMetricRecord) -> f64,
{
    records
        .iter()
        .map(metric)
        .filter(|value| value.is_finite())
        .fold(1.0, f64::max)
}

// Negative inputs (shrinking cities) clamp to 0 to keep the [0, 1] range.
fn scale(value: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}
