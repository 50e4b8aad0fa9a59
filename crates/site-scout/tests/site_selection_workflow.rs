use std::sync::Arc;

use async_trait::async_trait;
use site_scout::config::CollectorConfig;
use site_scout::providers::ProviderError;
use site_scout::workflows::site_selection::collector::{
    CommercialPriceSource, CompetitorSource, DemographicSource, FallbackDemographicSource,
    Geocoder, HistoricalPopulationSource, StaticFallbackDemographics, TransitSource,
};
use site_scout::workflows::site_selection::{
    Collaborators, Coordinates, Demographics, MetricCollector, MetricKind, PortfolioDataset,
    SiteSelectionService, VenueScan, WeightVector,
};

/// A fixed map of three cities with hand-picked metrics.
struct Atlas;

const CITIES: &[(&str, f64, u64, u32, u32, f64)] = &[
    // (query, latitude, population, competitors, transit, average sale price)
    ("Austin, TX", 30.27, 961_855, 18, 240, 1_800_000.0),
    ("Dallas, TX", 32.78, 1_304_379, 30, 410, 2_400_000.0),
    ("Toronto, ON", 43.65, 0, 12, 520, 0.0),
];

fn by_point(at: Coordinates) -> Option<&'static (&'static str, f64, u64, u32, u32, f64)> {
    CITIES.iter().find(|city| city.1 == at.latitude)
}

#[async_trait]
impl Geocoder for Atlas {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ProviderError> {
        Ok(CITIES
            .iter()
            .find(|city| city.0 == place)
            .map(|city| Coordinates::new(city.1, -97.0)))
    }
}

#[async_trait]
impl DemographicSource for Atlas {
    async fn demographics(
        &self,
        region: &str,
        locality: &str,
    ) -> Result<Demographics, ProviderError> {
        let query = format!("{locality}, {region}");
        Ok(CITIES
            .iter()
            .find(|city| city.0 == query)
            .map(|city| Demographics {
                population: Some(city.2),
                median_income: Some(80_000),
            })
            .unwrap_or_else(Demographics::unknown))
    }
}

#[async_trait]
impl HistoricalPopulationSource for Atlas {
    async fn population(
        &self,
        year: u16,
        _region: &str,
        locality: &str,
    ) -> Result<Option<u64>, ProviderError> {
        Ok(match (locality, year) {
            ("Austin", 2012) => Some(820_611),
            ("Austin", 2022) => Some(961_855),
            ("Dallas", 2012) => Some(1_241_162),
            ("Dallas", 2022) => Some(1_304_379),
            _ => None,
        })
    }
}

#[async_trait]
impl CompetitorSource for Atlas {
    async fn competitors(
        &self,
        at: Coordinates,
        _radius_meters: u32,
    ) -> Result<VenueScan, ProviderError> {
        Ok(by_point(at)
            .map(|city| VenueScan {
                count: Some(city.3),
                venues: Vec::new(),
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl TransitSource for Atlas {
    async fn transit_count(
        &self,
        at: Coordinates,
        _radius_meters: u32,
    ) -> Result<u32, ProviderError> {
        by_point(at)
            .map(|city| city.4)
            .ok_or(ProviderError::RateLimited)
    }
}

#[async_trait]
impl CommercialPriceSource for Atlas {
    async fn average_sale_price(
        &self,
        at: Coordinates,
        _radius_miles: f64,
    ) -> Result<Option<f64>, ProviderError> {
        Ok(by_point(at).map(|city| city.5).filter(|price| *price > 0.0))
    }
}

fn service(portfolio: Option<PortfolioDataset>) -> SiteSelectionService {
    let atlas = Arc::new(Atlas);
    let fallback: Arc<dyn FallbackDemographicSource> = Arc::new(StaticFallbackDemographics);
    let sources = Collaborators {
        geocoder: atlas.clone(),
        demographics: atlas.clone(),
        fallback_demographics: fallback,
        historical_population: atlas.clone(),
        competitors: atlas.clone(),
        transit: atlas.clone(),
        commercial_prices: atlas,
    };

    let mut collector = MetricCollector::new(sources, CollectorConfig::default());
    if let Some(dataset) = portfolio {
        collector = collector.with_portfolio(Arc::new(dataset));
    }
    SiteSelectionService::new(Arc::new(collector))
}

#[tokio::test]
async fn scoring_run_ranks_resolved_cities_and_skips_unknown_ones() {
    let report = service(None)
        .score(
            &["Austin, TX", "Springfield, XX", "Dallas, TX", "Toronto, ON"],
            WeightVector::default(),
        )
        .await
        .expect("scoring succeeds");

    assert_eq!(report.ranked.len(), 3);
    assert_eq!(report.unresolved, vec!["Springfield, XX".to_string()]);

    for pair in report.ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    let toronto = report
        .ranked
        .iter()
        .find(|scored| scored.record.query == "Toronto, ON")
        .expect("toronto ranked");
    // Filled in from the static Canadian table.
    assert_eq!(toronto.record.population, Some(2_794_356));
    assert_eq!(toronto.record.avg_commercial_price, None);
    assert_eq!(toronto.contribution(MetricKind::Price), 0.0);
    assert!(toronto.record.portfolio.is_none());

    let austin = report
        .ranked
        .iter()
        .find(|scored| scored.record.query == "Austin, TX")
        .expect("austin ranked");
    assert!(austin.record.growth > 0.07 && austin.record.growth < 0.09);
}

#[tokio::test]
async fn portfolio_weights_move_the_ranking() {
    let csv = "Location,Office Area,Total Area,Efficiency,Occupancy,CBITDA\n\
\"Austin, TX\",\"40,000\",\"60,000\",0.9,98%,\"$2,000,000\"\n";
    let dataset = PortfolioDataset::from_reader(csv.as_bytes()).expect("csv parses");
    let service = service(Some(dataset));

    let neutral = WeightVector::uniform(0.0).with(MetricKind::Population, 1.0);
    let report = service
        .score(&["Austin, TX", "Dallas, TX"], neutral)
        .await
        .expect("scoring succeeds");
    assert_eq!(report.ranked[0].record.query, "Dallas, TX");

    let portfolio_heavy = neutral.with(MetricKind::Cbitda, 3.0);
    let report = service
        .score(&["Austin, TX", "Dallas, TX"], portfolio_heavy)
        .await
        .expect("scoring succeeds");
    assert_eq!(report.ranked[0].record.query, "Austin, TX");
    assert_eq!(
        report.ranked[1]
            .record
            .portfolio
            .expect("portfolio configured")
            .matched_rows,
        0
    );
}
