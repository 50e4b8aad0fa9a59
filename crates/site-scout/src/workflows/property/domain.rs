use serde::{Deserialize, Serialize};

use crate::workflows::site_selection::domain::Coordinates;

/// Street address to look up, split the way property-record APIs expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyQuery {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl PropertyQuery {
    /// First address line, e.g. `1600 Amphitheatre Parkway`.
    pub fn line1(&self) -> &str {
        self.address.trim()
    }

    /// Second address line, e.g. `Mountain View, CA 94043`.
    pub fn line2(&self) -> String {
        format!(
            "{}, {} {}",
            self.city.trim(),
            self.state.trim(),
            self.zip_code.trim()
        )
        .trim_end()
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attom_id: Option<u64>,
    pub address: String,
    pub location: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Full record as returned by the source, for display.
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyProperty {
    pub address: String,
    pub location: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerContact {
    pub owner_name: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyReport {
    pub property: PropertyRecord,
    pub nearby: Vec<NearbyProperty>,
    pub owner: OwnerContact,
}
