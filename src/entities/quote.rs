//! Supplier quote - a response to a distributor demand

use serde::{Deserialize, Serialize};

/// Quote status (fixed at fixture time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteStatus::Pending => write!(f, "pending"),
            QuoteStatus::Accepted => write!(f, "accepted"),
            QuoteStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A supplier's answer to a demand
///
/// `demand_id` and `supplier_id` are not checked against the catalog;
/// callers report dangling references instead of rejecting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierQuote {
    pub id: String,
    pub demand_id: String,
    pub supplier_id: String,
    pub unit_price: f64,
    pub lead_time: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub status: QuoteStatus,
}

impl SupplierQuote {
    /// Quote total for a requested quantity
    pub fn total_for(&self, quantity: u32) -> f64 {
        self.unit_price * f64::from(quantity)
    }
}
