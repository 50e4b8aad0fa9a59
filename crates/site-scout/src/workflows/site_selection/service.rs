use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::collector::MetricCollector;
use super::domain::CityQuery;
use super::scoring::{ScoredRecord, ScoringEngine, WeightError, WeightVector};

/// Ranked output of one scoring run. Scores only compare cities within this run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub evaluated_at: DateTime<Utc>,
    pub weights: WeightVector,
    pub ranked: Vec<ScoredRecord>,
    pub unresolved: Vec<String>,
}

impl ScoreReport {
    pub fn warnings(&self) -> Vec<String> {
        self.unresolved
            .iter()
            .map(|city| format!("Could not locate '{city}'; it was left out of the ranking."))
            .collect()
    }
}

/// Composes the metric collector and the scoring engine into a single run.
pub struct SiteSelectionService {
    collector: Arc<MetricCollector>,
}

impl SiteSelectionService {
    pub fn new(collector: Arc<MetricCollector>) -> Self {
        Self { collector }
    }

    pub fn collector(&self) -> &MetricCollector {
        &self.collector
    }

    pub async fn score<S: AsRef<str>>(
        &self,
        cities: &[S],
        weights: WeightVector,
    ) -> Result<ScoreReport, SiteSelectionError> {
        weights.validate()?;

        let queries: Vec<CityQuery> = cities
            .iter()
            .map(|city| city.as_ref().trim())
            .filter(|city| !city.is_empty())
            .map(CityQuery::parse)
            .collect();

        let outcome = self.collector.collect_batch(&queries).await;
        for city in &outcome.unresolved {
            warn!(city = %city, "city left out of ranking");
        }

        let engine = ScoringEngine::new(weights);
        let ranked = engine.rank(outcome.records);

        if let Some(top) = ranked.first() {
            info!(
                cities = ranked.len(),
                leader = %top.record.query,
                score = top.score,
                "scoring run complete"
            );
        }

        Ok(ScoreReport {
            evaluated_at: Utc::now(),
            weights,
            ranked,
            unresolved: outcome.unresolved,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SiteSelectionError {
    #[error(transparent)]
    Weights(#[from] WeightError),
}
