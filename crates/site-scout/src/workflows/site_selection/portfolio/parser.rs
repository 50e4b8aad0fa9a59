use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::matching::LocationKey;

/// One inventory row with numeric columns already coerced.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PortfolioRow {
    pub(crate) location: String,
    pub(crate) key: LocationKey,
    pub(crate) office_area: f64,
    pub(crate) total_area: f64,
    pub(crate) efficiency: f64,
    pub(crate) occupancy: f64,
    pub(crate) cbitda: f64,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<PortfolioRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RawPortfolioRow>() {
        let row = record?;
        if row.location.trim().is_empty() {
            continue;
        }

        rows.push(PortfolioRow {
            key: LocationKey::parse(&row.location),
            location: row.location,
            office_area: row.office_area.unwrap_or(0.0),
            total_area: row.total_area.unwrap_or(0.0),
            efficiency: row.efficiency.unwrap_or(0.0),
            occupancy: row.occupancy.unwrap_or(0.0),
            cbitda: row.cbitda.unwrap_or(0.0),
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawPortfolioRow {
    #[serde(rename = "Location", alias = "location")]
    location: String,
    #[serde(
        rename = "Office Area",
        alias = "office_area",
        default,
        deserialize_with = "lenient_number"
    )]
    office_area: Option<f64>,
    #[serde(
        rename = "Total Area",
        alias = "total_area",
        default,
        deserialize_with = "lenient_number"
    )]
    total_area: Option<f64>,
    #[serde(
        rename = "Efficiency",
        alias = "efficiency",
        default,
        deserialize_with = "lenient_number"
    )]
    efficiency: Option<f64>,
    #[serde(
        rename = "Occupancy",
        alias = "occupancy",
        default,
        deserialize_with = "lenient_number"
    )]
    occupancy: Option<f64>,
    #[serde(
        rename = "CBITDA",
        alias = "cbitda",
        default,
        deserialize_with = "lenient_number"
    )]
    cbitda: Option<f64>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(parse_number))
}

/// Accepts spreadsheet-style figures such as `$1,250,000`, `87.5%` or `(1,200)`.
fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let negative = trimmed.starts_with('(') && trimmed.ends_with(')');
    let digits: String = trimmed
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | '%' | '(' | ')' | ' '))
        .collect();

    let parsed = digits.parse::<f64>().ok().filter(|number| number.is_finite())?;
    Some(if negative { -parsed } else { parsed })
}

#[cfg(test)]
pub(crate) fn parse_number_for_tests(value: &str) -> Option<f64> {
    parse_number(value)
}
