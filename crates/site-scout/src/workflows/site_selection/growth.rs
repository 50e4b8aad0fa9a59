//! Forward population growth projections.

/// Earlier census vintage used for the domestic growth rate.
pub const BASE_YEAR: u16 = 2012;
/// Later census vintage; also the vintage used for current demographics.
pub const REFERENCE_YEAR: u16 = 2022;
/// Years projected forward from the implied annual rate.
pub const FORWARD_YEARS: u32 = 5;

/// Total growth observed for fallback-region cities over [`FALLBACK_SPAN_YEARS`].
pub const FALLBACK_TOTAL_GROWTH: f64 = 0.052;
pub const FALLBACK_SPAN_YEARS: u32 = 5;

/// Constant annual rate implied by two population snapshots `years` apart.
pub fn annual_rate(earlier: u64, later: u64, years: u32) -> Option<f64> {
    if earlier == 0 || years == 0 {
        return None;
    }

    let ratio = later as f64 / earlier as f64;
    Some(ratio.powf(1.0 / f64::from(years)) - 1.0)
}

/// Compounds an annual rate over `years`.
pub fn project(annual_rate: f64, years: u32) -> f64 {
    (1.0 + annual_rate).powf(f64::from(years)) - 1.0
}

/// Projected growth for the domestic path; 0 when either snapshot is missing or
/// the earlier one is not positive.
pub fn projected_growth(earlier: Option<u64>, later: Option<u64>) -> f64 {
    let horizon = u32::from(REFERENCE_YEAR - BASE_YEAR);
    match (earlier, later) {
        (Some(earlier), Some(later)) => annual_rate(earlier, later, horizon)
            .map(|rate| project(rate, FORWARD_YEARS))
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Projected growth shared by every fallback-region city.
pub fn fallback_growth() -> f64 {
    let rate = (1.0 + FALLBACK_TOTAL_GROWTH).powf(1.0 / f64::from(FALLBACK_SPAN_YEARS)) - 1.0;
    project(rate, FORWARD_YEARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_year_history_projects_five_years() {
        let rate = annual_rate(100, 110, 10).expect("positive base");
        assert!((rate - 0.0096).abs() < 1e-3);
        assert!((project(rate, 5) - 0.0487).abs() < 1e-3);
    }

    #[test]
    fn projected_growth_uses_configured_horizon() {
        let growth = projected_growth(Some(100), Some(110));
        assert!((growth - 0.0487).abs() < 1e-3);
    }

    #[test]
    fn missing_or_zero_base_defaults_to_zero() {
        assert_eq!(projected_growth(None, Some(110)), 0.0);
        assert_eq!(projected_growth(Some(100), None), 0.0);
        assert_eq!(projected_growth(Some(0), Some(110)), 0.0);
    }

    #[test]
    fn shrinking_cities_project_negative_growth() {
        assert!(projected_growth(Some(120), Some(100)) < 0.0);
    }

    #[test]
    fn fallback_growth_is_constant_over_matching_span() {
        assert!((fallback_growth() - FALLBACK_TOTAL_GROWTH).abs() < 1e-9);
    }
}
