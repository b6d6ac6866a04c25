//! Purchase order entity - the mock PO a buyer sends to a supplier

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// Where an item list came from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferSource {
    /// Typed in by the buyer
    #[default]
    Manual,
    /// Imported from a fixed sales order
    SalesOrder { id: String },
}

impl std::fmt::Display for TransferSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferSource::Manual => write!(f, "manual"),
            TransferSource::SalesOrder { id } => write!(f, "sales order {}", id),
        }
    }
}

/// PO status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoStatus {
    #[default]
    Draft,
    Sent,
}

impl std::fmt::Display for PoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoStatus::Draft => write!(f, "draft"),
            PoStatus::Sent => write!(f, "sent"),
        }
    }
}

/// One ordered line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product as requested
    pub product: String,

    /// Supplier product the request matched (stock key or coverage entry)
    pub matched_product: String,

    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    pub unit_price: f64,
    pub line_total: f64,
}

/// A purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: EntityId,
    pub supplier_id: String,
    pub supplier_name: String,
    pub lines: Vec<OrderLine>,
    pub total: f64,

    /// Requested products the supplier could not cover
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,

    #[serde(default)]
    pub source: TransferSource,

    #[serde(default)]
    pub status: PoStatus,

    pub author: String,
    pub created: DateTime<Utc>,
}

impl Entity for PurchaseOrder {
    const PREFIX: EntityPrefix = EntityPrefix::Po;

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_source_serialization() {
        let json = serde_json::to_value(TransferSource::SalesOrder {
            id: "SO-2024-001".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "sales_order");
        assert_eq!(json["id"], "SO-2024-001");

        let manual: TransferSource = serde_json::from_str(r#"{"kind":"manual"}"#).unwrap();
        assert_eq!(manual, TransferSource::Manual);
    }
}
