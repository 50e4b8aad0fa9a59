mod matching;
mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use parser::PortfolioRow;
use tracing::debug;

use super::domain::{CityQuery, PortfolioMetrics};

#[derive(Debug, thiserror::Error)]
pub enum PortfolioImportError {
    #[error("failed to read portfolio dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid portfolio CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Internal inventory table loaded once per process and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct PortfolioDataset {
    rows: Vec<PortfolioRow>,
}

impl PortfolioDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PortfolioImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PortfolioImportError> {
        let rows = parser::parse_rows(reader)?;
        debug!(rows = rows.len(), "loaded portfolio dataset");
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Location identifiers of the rows matching `query`.
    pub fn matching_locations<'a>(&'a self, query: &CityQuery) -> Vec<&'a str> {
        self.matching_rows(query)
            .map(|row| row.location.as_str())
            .collect()
    }

    /// Sums areas and CBITDA, averages efficiency and occupancy. No match yields zeros.
    pub fn metrics_for(&self, query: &CityQuery) -> PortfolioMetrics {
        let mut metrics = PortfolioMetrics::default();

        for row in self.matching_rows(query) {
            metrics.office_area += row.office_area;
            metrics.total_area += row.total_area;
            metrics.efficiency += row.efficiency;
            metrics.occupancy += row.occupancy;
            metrics.cbitda += row.cbitda;
            metrics.matched_rows += 1;
        }

        if metrics.matched_rows > 0 {
            let rows = metrics.matched_rows as f64;
            metrics.efficiency /= rows;
            metrics.occupancy /= rows;
        }

        metrics
    }

    fn matching_rows<'a, 'q>(
        &'a self,
        query: &'q CityQuery,
    ) -> impl Iterator<Item = &'a PortfolioRow> + 'q
    where
        'a: 'q,
    {
        self.rows.iter().filter(move |row| row.key.matches(query))
    }
}
