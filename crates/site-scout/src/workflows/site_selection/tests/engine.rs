use super::common::*;

use crate::workflows::site_selection::domain::PortfolioMetrics;
use crate::workflows::site_selection::scoring::{MetricKind, ScoringEngine, WeightVector};

#[test]
fn worked_example_ranks_larger_city_first() {
    let batch = vec![
        record("CityY", Some(250_000), 5, 10),
        record("CityX", Some(500_000), 10, 20),
    ];
    let weights = WeightVector::uniform(1.0).with(MetricKind::Price, 0.0);

    let ranked = ScoringEngine::new(weights).rank(batch);

    assert_eq!(ranked[0].record.query, "CityX");
    assert_eq!(ranked[1].record.query, "CityY");

    let x = &ranked[0];
    assert_close(x.normalized.population, 1.0);
    assert_close(x.normalized.competition, 1.0);
    assert_close(x.normalized.transit, 1.0);
    assert_close(x.score, 1.0);

    let y = &ranked[1];
    assert_close(y.normalized.population, 0.5);
    assert_close(y.normalized.competition, 0.5);
    assert_close(y.normalized.transit, 0.5);
    assert_close(y.score, 0.5);
}

#[test]
fn normalized_values_stay_within_unit_interval() {
    let mut batch = vec![
        record("Big, TX", Some(2_300_000), 42, 310),
        record("Small, TX", Some(9_000), 0, 3),
        record("Unknown, TX", None, 7, 0),
    ];
    batch[0].growth = 0.31;
    batch[1].growth = -0.04;
    batch[2].median_income = Some(71_000);
    batch[1].portfolio = Some(PortfolioMetrics {
        office_area: 12_000.0,
        total_area: 20_000.0,
        efficiency: 0.6,
        occupancy: 92.0,
        cbitda: -50_000.0,
        matched_rows: 2,
    });

    let ranked = ScoringEngine::new(WeightVector::default()).rank(batch);
    for scored in &ranked {
        for value in scored.normalized.values() {
            assert!(
                (0.0..=1.0).contains(&value),
                "{} normalized outside [0, 1]: {value}",
                scored.record.query
            );
        }
    }
}

#[test]
fn single_city_normalizes_present_metrics_to_one() {
    let mut only = record("Solo, NV", Some(64_000), 3, 0);
    only.portfolio = Some(PortfolioMetrics {
        office_area: 4_000.0,
        ..PortfolioMetrics::default()
    });

    let ranked = ScoringEngine::new(WeightVector::default()).rank(vec![only]);
    let normalized = ranked[0].normalized;

    assert_eq!(normalized.population, 1.0);
    assert_eq!(normalized.competition, 1.0);
    assert_eq!(normalized.office_area, 1.0);
    assert_eq!(normalized.transit, 0.0);
    assert_eq!(normalized.median_income, 0.0);
    assert_eq!(normalized.cbitda, 0.0);
}

#[test]
fn single_city_keeps_fractional_values_below_one() {
    let mut only = record("Solo, NV", Some(64_000), 0, 0);
    only.growth = 0.3;
    only.portfolio = Some(PortfolioMetrics {
        efficiency: 0.6,
        matched_rows: 1,
        ..PortfolioMetrics::default()
    });

    let ranked = ScoringEngine::new(WeightVector::default()).rank(vec![only]);
    let normalized = ranked[0].normalized;

    // Bounds never drop below 1, so ratios under 1 pass through unscaled.
    assert_close(normalized.efficiency, 0.6);
    assert_close(normalized.growth, 0.3);
    assert_eq!(normalized.population, 1.0);
}

#[test]
fn all_zero_metric_normalizes_to_zero() {
    let batch = vec![record("A, OH", Some(1), 0, 0), record("B, OH", Some(1), 0, 0)];
    let ranked = ScoringEngine::new(WeightVector::default()).rank(batch);
    assert!(ranked.iter().all(|scored| scored.normalized.competition == 0.0));
    assert!(ranked.iter().all(|scored| scored.normalized.transit == 0.0));
}

#[test]
fn equal_scores_keep_input_order() {
    let batch = vec![
        record("First, IA", Some(100_000), 4, 8),
        record("Leader, IA", Some(400_000), 0, 8),
        record("Second, IA", Some(100_000), 4, 8),
        record("Third, IA", Some(100_000), 4, 8),
    ];

    let ranked = ScoringEngine::new(WeightVector::default()).rank(batch);
    let order: Vec<&str> = ranked.iter().map(|scored| scored.record.query.as_str()).collect();
    assert_eq!(order, ["Leader, IA", "First, IA", "Second, IA", "Third, IA"]);
}

#[test]
fn heavier_competition_weight_never_raises_a_score() {
    let batch = vec![
        record("Crowded, CO", Some(300_000), 25, 40),
        record("Quiet, CO", Some(280_000), 0, 35),
    ];

    let mut previous: Option<Vec<f64>> = None;
    for weight in [0.0, 0.5, 1.0, 2.0, 5.0] {
        let weights = WeightVector::default().with(MetricKind::Competition, weight);
        let ranked = ScoringEngine::new(weights).rank(batch.clone());
        let mut scores: Vec<(String, f64)> = ranked
            .into_iter()
            .map(|scored| (scored.record.query, scored.score))
            .collect();
        scores.sort_by(|a, b| a.0.cmp(&b.0));
        let scores: Vec<f64> = scores.into_iter().map(|(_, score)| score).collect();

        if let Some(before) = &previous {
            // Crowded sorts first by name and has competitors; Quiet has none.
            assert!(scores[0] < before[0]);
            assert_close(scores[1], before[1]);
        }
        previous = Some(scores);
    }
}

#[test]
fn cheaper_commercial_space_scores_higher() {
    let mut cheap = record("Cheap, GA", Some(150_000), 2, 5);
    cheap.avg_commercial_price = Some(500_000.0);
    let mut pricey = record("Pricey, GA", Some(150_000), 2, 5);
    pricey.avg_commercial_price = Some(2_000_000.0);

    let ranked = ScoringEngine::new(WeightVector::default()).rank(vec![pricey, cheap]);

    assert_eq!(ranked[0].record.query, "Cheap, GA");
    assert!(ranked[0].score > ranked[1].score);
    assert_close(ranked[0].contribution(MetricKind::Price), -0.5);
    assert_close(ranked[1].contribution(MetricKind::Price), -2.0);
}

#[test]
fn growth_counts_in_proportion_to_population() {
    let mut small_fast = record("Tiny, UT", Some(20_000), 0, 0);
    small_fast.growth = 0.4;
    let mut large_steady = record("Large, UT", Some(1_000_000), 0, 0);
    large_steady.growth = 0.05;

    let weights = WeightVector::uniform(0.0).with(MetricKind::Growth, 1.0);
    let ranked = ScoringEngine::new(weights).rank(vec![small_fast, large_steady]);

    // growth max is floored at 1, so inputs are the raw fractions.
    assert_eq!(ranked[0].record.query, "Large, UT");
    assert_close(ranked[0].score, 0.05);
    assert_close(ranked[1].score, 0.4 * 0.02);
}

#[test]
fn empty_batch_yields_empty_ranking() {
    assert!(ScoringEngine::new(WeightVector::default()).rank(Vec::new()).is_empty());
}
