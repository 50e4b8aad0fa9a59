use super::normalizer::normalize_name;
use crate::workflows::site_selection::domain::CityQuery;

/// Normalized locality/region pair derived from a location identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocationKey {
    locality: String,
    region: Option<String>,
}

impl LocationKey {
    /// Splits at the last comma, e.g. `"Austin, TX"` or `"Austin - Downtown, TX"`.
    pub(crate) fn parse(identifier: &str) -> Self {
        let normalized = normalize_name(identifier);
        match normalized.rsplit_once(',') {
            Some((locality, region)) => Self {
                locality: locality.trim().to_string(),
                region: Some(region.trim().to_string()).filter(|region| !region.is_empty()),
            },
            None => Self {
                locality: normalized,
                region: None,
            },
        }
    }

    /// Exact, region-qualified comparison: "York, PA" never matches "New York, NY".
    pub(crate) fn matches(&self, query: &CityQuery) -> bool {
        let locality = normalize_name(query.locality());
        let region = query.region().map(normalize_name);

        match (&self.region, region) {
            (Some(row_region), Some(query_region)) => {
                self.locality == locality && *row_region == query_region
            }
            (Some(_), None) => self.locality == locality,
            (None, Some(query_region)) => {
                self.locality == locality || self.locality == format!("{locality} {query_region}")
            }
            (None, None) => self.locality == locality,
        }
    }
}
