//! Versioned item-list handoff between import and review
//!
//! A transfer is JSON carried in the `order` query parameter of a
//! `baskit://review?...` link. Decoding validates the payload against an
//! embedded JSON Schema before it is deserialized.

use chrono::{DateTime, Utc};
use jsonschema::validator_for;
use miette::Diagnostic;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::entities::{ProcurementItem, TransferSource};
use crate::messaging::{percent_decode, percent_encode};

/// Payload version this build reads and writes
pub const TRANSFER_VERSION: u32 = 1;

/// Scheme and path of review links
pub const LINK_PREFIX: &str = "baskit://review";

const ORDER_PARAM: &str = "order";
const SCHEMA_FILE: &str = "order_transfer.schema.json";

#[derive(Embed)]
#[folder = "data/schemas/"]
struct EmbeddedSchemas;

/// Errors decoding a transfer
#[derive(Debug, Error, Diagnostic)]
pub enum TransferError {
    #[error("link has no 'order' parameter")]
    #[diagnostic(
        code(baskit::orders::transfer_missing_param),
        help("expected baskit://review?order=<encoded JSON>, a bare query string or raw JSON")
    )]
    MissingParam,

    #[error("'order' parameter is not valid percent-encoded UTF-8")]
    #[diagnostic(code(baskit::orders::transfer_decode))]
    Decode,

    #[error("transfer payload is not valid JSON: {0}")]
    #[diagnostic(code(baskit::orders::transfer_json))]
    Json(#[from] serde_json::Error),

    #[error("unsupported transfer version {0}")]
    #[diagnostic(
        code(baskit::orders::transfer_version),
        help("this build reads version 1")
    )]
    UnsupportedVersion(u64),

    #[error("transfer payload failed validation:\n  {}", .0.join("\n  "))]
    #[diagnostic(code(baskit::orders::transfer_schema))]
    Schema(Vec<String>),
}

/// An item list in flight from an import to the review step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTransfer {
    pub version: u32,

    #[serde(default)]
    pub source: TransferSource,

    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,

    pub items: Vec<ProcurementItem>,
}

impl OrderTransfer {
    pub fn new(source: TransferSource, items: Vec<ProcurementItem>) -> Self {
        Self {
            version: TRANSFER_VERSION,
            source,
            created: Utc::now(),
            items,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// `baskit://review?order=<percent-encoded JSON>`
    pub fn to_link(&self) -> Result<String, serde_json::Error> {
        Ok(format!(
            "{}?{}={}",
            LINK_PREFIX,
            ORDER_PARAM,
            percent_encode(&self.to_json()?)
        ))
    }

    /// Decode a full link, a bare query string or raw JSON
    pub fn decode(input: &str) -> Result<Self, TransferError> {
        let input = input.trim();
        let json = if input.starts_with('{') {
            input.to_string()
        } else {
            let query = match input.split_once('?') {
                Some((_, query)) => query,
                None => input,
            };
            let raw = query
                .split('&')
                .find_map(|pair| match pair.split_once('=') {
                    Some((key, value)) if key == ORDER_PARAM => Some(value),
                    _ => None,
                })
                .ok_or(TransferError::MissingParam)?;
            percent_decode(raw).ok_or(TransferError::Decode)?
        };

        Self::from_json(&json)
    }

    /// Check version and schema, then deserialize
    pub fn from_json(json: &str) -> Result<Self, TransferError> {
        let value: JsonValue = serde_json::from_str(json)?;

        if let Some(version) = value.get("version").and_then(JsonValue::as_u64) {
            if version != u64::from(TRANSFER_VERSION) {
                return Err(TransferError::UnsupportedVersion(version));
            }
        }

        let violations = schema_violations(&value);
        if !violations.is_empty() {
            tracing::debug!(count = violations.len(), "transfer payload rejected by schema");
            return Err(TransferError::Schema(violations));
        }

        let transfer: OrderTransfer = serde_json::from_value(value)?;
        tracing::debug!(
            source = %transfer.source,
            items = transfer.items.len(),
            "transfer decoded"
        );
        Ok(transfer)
    }
}

/// Schema violations as `<path>: <message>`, empty when valid
fn schema_violations(value: &JsonValue) -> Vec<String> {
    let schema = match EmbeddedSchemas::get(SCHEMA_FILE)
        .and_then(|file| serde_json::from_slice::<JsonValue>(file.data.as_ref()).ok())
    {
        Some(schema) => schema,
        None => return vec![format!("embedded schema '{}' is unavailable", SCHEMA_FILE)],
    };

    let validator = match validator_for(&schema) {
        Ok(v) => v,
        Err(e) => return vec![format!("embedded schema is invalid: {}", e)],
    };

    validator
        .iter_errors(value)
        .map(|error| {
            let path = if error.instance_path.as_str().is_empty() {
                "document root".to_string()
            } else {
                error.instance_path.to_string()
            };
            format!("{}: {}", path, error)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrderTransfer {
        OrderTransfer::new(
            TransferSource::SalesOrder {
                id: "SO-2024-001".into(),
            },
            vec![
                ProcurementItem::new("Indomie Goreng", 200)
                    .with_target_price(3000.0)
                    .with_unit("pcs"),
                ProcurementItem::new("Teh Botol Sosro", 100),
            ],
        )
    }

    #[test]
    fn test_link_decodes_to_same_items() {
        let transfer = sample();
        let link = transfer.to_link().unwrap();
        assert!(link.starts_with("baskit://review?order=%7B"));

        let decoded = OrderTransfer::decode(&link).unwrap();
        assert_eq!(decoded, transfer);
    }

    #[test]
    fn test_decode_bare_query_and_raw_json() {
        let transfer = sample();
        let encoded = percent_encode(&transfer.to_json().unwrap());

        let from_query = OrderTransfer::decode(&format!("foo=bar&order={}", encoded)).unwrap();
        assert_eq!(from_query.items, transfer.items);

        let from_json = OrderTransfer::decode(&transfer.to_json().unwrap()).unwrap();
        assert_eq!(from_json.source, transfer.source);
    }

    #[test]
    fn test_created_defaults_when_absent() {
        let json = r#"{"version":1,"items":[{"product":"Aqua 600ml","quantity":24}]}"#;
        let transfer = OrderTransfer::decode(json).unwrap();
        assert_eq!(transfer.source, TransferSource::Manual);
        assert_eq!(transfer.items[0].quantity, 24);
    }

    #[test]
    fn test_rejects_other_versions() {
        let json = r#"{"version":2,"items":[{"product":"Aqua","quantity":1}]}"#;
        assert!(matches!(
            OrderTransfer::decode(json),
            Err(TransferError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_zero_quantity_fails_schema() {
        let json = r#"{"version":1,"items":[{"product":"Aqua","quantity":0}]}"#;
        match OrderTransfer::decode(json) {
            Err(TransferError::Schema(violations)) => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].starts_with("/items/0/quantity"));
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_sales_order_source_requires_id() {
        let json = r#"{"version":1,"source":{"kind":"sales_order"},"items":[{"product":"Aqua","quantity":1}]}"#;
        assert!(matches!(
            OrderTransfer::decode(json),
            Err(TransferError::Schema(_))
        ));
    }

    #[test]
    fn test_missing_param_and_bad_json() {
        assert!(matches!(
            OrderTransfer::decode("baskit://review?items=1"),
            Err(TransferError::MissingParam)
        ));
        assert!(matches!(
            OrderTransfer::decode("order=%7Bnot-json"),
            Err(TransferError::Json(_))
        ));
        assert!(matches!(
            OrderTransfer::decode("order=%FF"),
            Err(TransferError::Decode)
        ));
    }
}
