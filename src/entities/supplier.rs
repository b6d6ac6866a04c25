//! Supplier entity - catalog entries the matcher runs against

use serde::{Deserialize, Serialize};

/// Supplier contact person
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A static catalog supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// Catalog key (e.g. "SUP-001"), also the key into the stock table
    pub id: String,

    pub name: String,

    /// Rating on a 0-5 scale
    pub rating: f64,

    /// Coverage categories the supplier claims to serve
    #[serde(default)]
    pub coverage: Vec<String>,

    /// Fixed unit price used when the supplier has no stock table
    pub price: f64,

    /// Free-text lead time, e.g. "2-3 days"
    pub lead_time: String,

    /// Free-text location, exact key into the distance table
    pub location: String,

    /// Static flag set on fixtures, not computed
    #[serde(default)]
    pub ai_recommended: bool,

    #[serde(default)]
    pub contact: Contact,
}

impl Supplier {
    /// Coverage list joined for display
    pub fn coverage_display(&self) -> String {
        self.coverage.join(", ")
    }
}

/// Stock of one supplier product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub available: bool,
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
}
