//! Sales order - a predefined item list importable by id

use serde::{Deserialize, Serialize};

use crate::entities::item::ProcurementItem;

/// A fixed sales order from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    /// Fixed id such as "SO-2024-001"
    pub id: String,
    pub customer: String,
    pub items: Vec<ProcurementItem>,
}

impl SalesOrder {
    /// Whether `id` names this order, ignoring case and surrounding whitespace
    pub fn matches_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_id() {
        let so = SalesOrder {
            id: "SO-2024-001".into(),
            customer: "Toko Makmur".into(),
            items: vec![],
        };
        assert!(so.matches_id("  so-2024-001 "));
        assert!(!so.matches_id("SO-2024-0011"));
    }
}
