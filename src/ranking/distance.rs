//! Distance lookup keyed by exact location string

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distance assumed for locations missing from the table
pub const DEFAULT_DISTANCE_KM: f64 = 50.0;

/// Travel estimate assumed for locations missing from the table
pub const DEFAULT_ETA: &str = "1-2 hours";

/// Distance and travel estimate to one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub km: f64,
    pub eta: String,
}

impl Default for DistanceEntry {
    fn default() -> Self {
        Self {
            km: DEFAULT_DISTANCE_KM,
            eta: DEFAULT_ETA.to_string(),
        }
    }
}

/// Location -> distance table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceTable(BTreeMap<String, DistanceEntry>);

impl DistanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, km: f64, eta: impl Into<String>) {
        self.0.insert(
            location.into(),
            DistanceEntry {
                km,
                eta: eta.into(),
            },
        );
    }

    /// Entry for an exact location key
    pub fn get(&self, location: &str) -> Option<&DistanceEntry> {
        self.0.get(location)
    }

    /// Entry for `location`, or the 50 km default when unknown
    pub fn lookup(&self, location: &str) -> DistanceEntry {
        self.get(location).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_and_unknown() {
        let mut table = DistanceTable::new();
        table.insert("Bekasi", 24.0, "45-60 min");

        assert_eq!(table.lookup("Bekasi").km, 24.0);
        let fallback = table.lookup("Surabaya");
        assert_eq!(fallback.km, DEFAULT_DISTANCE_KM);
        assert_eq!(fallback.eta, DEFAULT_ETA);
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut table = DistanceTable::new();
        table.insert("Jakarta Barat", 8.5, "20-30 min");
        assert!(table.get("jakarta barat").is_none());
        assert!(table.get("Jakarta Barat ").is_none());
    }

    #[test]
    fn test_deserializes_as_plain_map() {
        let table: DistanceTable =
            serde_yml::from_str("Depok:\n  km: 31.0\n  eta: 60-75 min\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("Depok").eta, "60-75 min");
    }
}
