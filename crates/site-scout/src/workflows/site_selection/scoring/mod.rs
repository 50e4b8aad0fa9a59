mod config;
mod normalize;
mod rules;

pub use config::{MetricKind, WeightError, WeightVector, MAX_SLIDER_WEIGHT};
pub use normalize::{NormalizationBounds, NormalizedMetrics};

use super::domain::RawMetricRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Stateless engine applying one weight vector to a batch of cities.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: WeightVector,
}

impl ScoringEngine {
    pub fn new(weights: WeightVector) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// Normalizes against the batch, scores every record and sorts descending.
    /// Equal scores keep their input order.
    pub fn rank(&self, records: Vec<RawMetricRecord>) -> Vec<ScoredRecord> {
        if records.is_empty() {
            return Vec::new();
        }

        let bounds = NormalizationBounds::from_records(&records);
        let mut scored: Vec<ScoredRecord> = records
            .into_iter()
            .map(|record| self.score(record, &bounds))
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored
    }

    fn score(&self, record: RawMetricRecord, bounds: &NormalizationBounds) -> ScoredRecord {
        let normalized = bounds.normalize(&record);
        let (components, score) = rules::score_record(&record, &normalized, &self.weights);

        ScoredRecord {
            record,
            normalized,
            score,
            components,
        }
    }
}

/// Weighted contribution of one metric, kept for transparent breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub metric: MetricKind,
    pub weight: f64,
    /// Normalized value (growth already multiplied by population; price in millions).
    pub input: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: RawMetricRecord,
    pub normalized: NormalizedMetrics,
    pub score: f64,
    pub components: Vec<ScoreComponent>,
}

impl ScoredRecord {
    pub fn contribution(&self, metric: MetricKind) -> f64 {
        self.components
            .iter()
            .find(|component| component.metric == metric)
            .map(|component| component.contribution)
            .unwrap_or(0.0)
    }
}
