use super::super::domain::RawMetricRecord;
use super::config::{MetricKind, WeightVector};
use super::normalize::NormalizedMetrics;
use super::ScoreComponent;

/// Sale prices enter the score in millions.
pub(crate) const PRICE_SCALE: f64 = 1_000_000.0;

pub(crate) fn score_record(
    record: &RawMetricRecord,
    normalized: &NormalizedMetrics,
    weights: &WeightVector,
) -> (Vec<ScoreComponent>, f64) {
    let price_millions = record.avg_commercial_price.unwrap_or(0.0) / PRICE_SCALE;

    // Growth only matters in proportion to city size.
    let terms = [
        (MetricKind::Population, normalized.population),
        (
            MetricKind::Growth,
            normalized.growth * normalized.population,
        ),
        (MetricKind::Transit, normalized.transit),
        (MetricKind::Competition, normalized.competition),
        (MetricKind::OfficeArea, normalized.office_area),
        (MetricKind::TotalArea, normalized.total_area),
        (MetricKind::Efficiency, normalized.efficiency),
        (MetricKind::Occupancy, normalized.occupancy),
        (MetricKind::Cbitda, normalized.cbitda),
        (MetricKind::Price, price_millions),
    ];

    let mut components = Vec::with_capacity(terms.len());
    let mut total_score = 0.0;

    for (metric, input) in terms {
        let weight = weights.get(metric);
        if weight == 0.0 {
            continue;
        }

        let sign = if metric.is_cost() { -1.0 } else { 1.0 };
        let contribution = sign * weight * input;
        total_score += contribution;
        components.push(ScoreComponent {
            metric,
            weight,
            input,
            contribution,
        });
    }

    (components, total_score)
}
